//! NNTP response types and status codes

use std::fmt;

/// Single-line NNTP response: the status code and the text after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NntpResponse {
    /// 3-digit NNTP response code
    pub code: ResponseCode,
    /// Status message from server
    pub message: String,
}

impl NntpResponse {
    /// Raw numeric code
    pub fn raw_code(&self) -> u16 {
        self.code.as_u16()
    }

    /// Check if response indicates success (2xx)
    pub fn is_success(&self) -> bool {
        self.code.family() == Family::Success
    }

    /// Check if response indicates continuation (3xx)
    pub fn is_continuation(&self) -> bool {
        self.code.family() == Family::Continuation
    }

    /// Check if response indicates error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code.family() == Family::Failure
    }
}

/// Response code family, taken from the first digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Continuation,
    /// 4xx and 5xx (and anything outside 100-399)
    Failure,
}

macro_rules! response_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal, )*) => {
        /// NNTP response codes (RFC 977, RFC 2980, RFC 3977, RFC 4643)
        ///
        /// Codes the engine has no name for are kept as [`ResponseCode::Other`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResponseCode {
            $( $(#[$doc])* $name, )*
            /// Any code without a named variant
            Other(u16),
        }

        impl ResponseCode {
            /// Classify a raw 3-digit code
            pub fn from_u16(code: u16) -> Self {
                match code {
                    $( $value => ResponseCode::$name, )*
                    other => ResponseCode::Other(other),
                }
            }

            /// Numeric value of this code
            pub fn as_u16(self) -> u16 {
                match self {
                    $( ResponseCode::$name => $value, )*
                    ResponseCode::Other(code) => code,
                }
            }
        }
    };
}

response_codes! {
    // 1xx - Informational
    /// Help text follows
    HelpFollows = 100,
    /// Capability list follows (RFC 3977 Section 5.2)
    CapabilitiesFollow = 101,
    /// Server date/time (RFC 3977 Section 7.1)
    ServerDate = 111,

    // 2xx - Success
    /// Server ready, posting allowed
    ReadyPostingAllowed = 200,
    /// Server ready, no posting
    ReadyPostingProhibited = 201,
    /// Slave status noted
    SlaveRecognized = 202,
    /// Closing connection
    ClosingConnection = 205,
    /// Group selected
    GroupSelected = 211,
    /// Information follows (LIST variants)
    InformationFollows = 215,
    /// Article follows
    ArticleFollows = 220,
    /// Head follows
    HeadFollows = 221,
    /// Body follows
    BodyFollows = 222,
    /// Article exists and is selected
    ArticleSelected = 223,
    /// Overview information follows
    OverviewFollows = 224,
    /// Headers follow
    HeadersFollow = 225,
    /// List of new articles follows (RFC 3977 Section 7.4)
    NewArticlesFollow = 230,
    /// List of new newsgroups follows (RFC 3977 Section 7.3)
    NewGroupsFollow = 231,
    /// Article transferred OK (RFC 3977 Section 6.3.2)
    TransferSuccess = 235,
    /// Article posted successfully (RFC 3977 Section 6.3.1)
    PostingSuccess = 240,
    /// Authentication accepted
    AuthenticationAccepted = 281,

    // 3xx - Continuation
    /// Send article to be transferred (RFC 3977 Section 6.3.2)
    TransferSend = 335,
    /// Send article to be posted
    PostingSend = 340,
    /// Password required
    AuthenticationContinue = 381,

    // 4xx - Temporary errors
    /// Service discontinued
    ServiceUnavailable = 400,
    /// Wrong mode
    WrongMode = 401,
    /// Internal fault or server resource problem
    InternalFault = 403,
    /// No such newsgroup
    NoSuchGroup = 411,
    /// No newsgroup selected
    NoGroupSelected = 412,
    /// Current article number is invalid
    NoArticleSelected = 420,
    /// No next article
    NoNextArticle = 421,
    /// No previous article
    NoPreviousArticle = 422,
    /// No article with that number
    NoSuchArticleNumber = 423,
    /// No article with that message-id
    NoSuchArticleId = 430,
    /// Article not wanted
    TransferUnwanted = 435,
    /// Transfer not possible; try again later
    TransferFailure = 436,
    /// Transfer rejected; do not retry
    TransferRejected = 437,
    /// Posting not permitted
    PostingProhibited = 440,
    /// Posting failed
    PostingFailure = 441,
    /// Authentication required
    AuthenticationRequired = 480,
    /// Authentication failed
    AuthenticationFailed = 481,
    /// Authentication commands issued out of sequence
    AuthenticationRejected = 482,
    /// Encryption or stronger authentication required
    EncryptionRequired = 483,

    // 5xx - Permanent errors
    /// Command not recognized
    UnknownCommand = 500,
    /// Command syntax error
    SyntaxError = 501,
    /// Access restriction or permission denied
    NotPermitted = 502,
    /// Feature not supported
    NotSupported = 503,
    /// Error in base64-encoding of an argument
    Base64EncodingError = 504,
}

impl ResponseCode {
    /// Family of this code
    pub fn family(self) -> Family {
        match self.as_u16() / 100 {
            1 => Family::Informational,
            2 => Family::Success,
            3 => Family::Continuation,
            _ => Family::Failure,
        }
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        ResponseCode::from_u16(code)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.as_u16())
    }
}
