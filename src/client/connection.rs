//! Connection management for NNTP client
//!
//! This module handles TCP/TLS connection establishment, socket tuning,
//! and server greeting validation.

use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::response::ResponseCode;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::{debug, warn};

use super::io::unexpected;
use super::state::ConnectionState;
use super::{NntpClient, NntpIo};

/// BufReader capacity for article downloads (256KB)
const BUFREADER_CAPACITY: usize = 256 * 1024;

/// Socket receive buffer requested from the OS (4MB)
const RECV_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Socket send buffer requested from the OS (1MB)
const SEND_BUFFER_SIZE: usize = 1024 * 1024;

/// Dangerous certificate verifier that accepts all certificates
///
/// **Security Warning:** This verifier disables all certificate validation,
/// making connections vulnerable to man-in-the-middle attacks. Only use this
/// for testing or with servers you trust on a secure network.
#[derive(Debug)]
pub(super) struct DangerousAcceptAnyCertificate;

impl ServerCertVerifier for DangerousAcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        // Accept any certificate without validation
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        // Accept any signature without validation
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        // Accept any signature without validation
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        // Support all signature schemes
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

impl NntpClient {
    /// Connect to the NNTP server described by `config`
    ///
    /// Dials TCP, wraps the stream in TLS when `config.tls` is set, and reads
    /// the greeting. Does not authenticate - call
    /// [`authenticate`](Self::authenticate) after connecting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Io`] - TCP connection fails (DNS resolution, network unreachable, etc.)
    /// - [`NntpError::Tls`] - TLS handshake fails (invalid certificate, protocol error)
    /// - [`NntpError::Timeout`] - Connect or handshake exceeded `config.connect_timeout`
    /// - [`NntpError::Protocol`] - Server greeting is not 200 or 201
    pub async fn connect(config: Arc<ServerConfig>) -> Result<Self> {
        debug!("Connecting to NNTP server {}:{}", config.host, config.port);

        let tcp_stream = connect_tcp(&config).await?;

        if !config.tls {
            return Self::from_stream(tcp_stream, config).await;
        }

        let tls_stream = handshake_tls(&config, tcp_stream).await?;
        Self::from_stream(tls_stream, config).await
    }

    /// Run the client over an already-connected stream
    ///
    /// Reads the greeting: 200 means posting is allowed, 201 that it is not.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nntp_engine::{NntpClient, ServerConfig};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let tcp = tokio::net::TcpStream::connect("localhost:119").await?;
    /// let config = Arc::new(ServerConfig::plain("localhost", "", ""));
    /// let client = NntpClient::from_stream(tcp, config).await?;
    /// println!("posting allowed: {}", client.posting_allowed());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`] for any other greeting code, and the
    /// usual I/O, timeout and framing errors.
    pub async fn from_stream<S>(stream: S, config: Arc<ServerConfig>) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let boxed: Box<dyn NntpIo> = Box::new(stream);
        let mut client = Self {
            stream: BufReader::with_capacity(BUFREADER_CAPACITY, boxed),
            pending_body: None,
            state: ConnectionState::AwaitingStatus,
            config,
            current_group: None,
            posting_allowed: false,
            authenticated: false,
            is_broken: false,
        };

        let greeting = client.read_response().await?;
        debug!("Server greeting: {} {}", greeting.code, greeting.message);

        client.posting_allowed = match greeting.code {
            ResponseCode::ReadyPostingAllowed => true,
            ResponseCode::ReadyPostingProhibited => false,
            _ => {
                client.state = ConnectionState::Closed;
                return Err(unexpected("greeting", greeting));
            }
        };

        Ok(client)
    }
}

/// Resolve the server address and open a tuned TCP connection
async fn connect_tcp(config: &ServerConfig) -> Result<TcpStream> {
    let addr = format!("{}:{}", config.host, config.port);
    let socket_addr = tokio::net::lookup_host(&addr)
        .await
        .map_err(|e| {
            NntpError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Failed to resolve address {}: {}", addr, e),
            ))
        })?
        .next()
        .ok_or_else(|| {
            NntpError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("No address resolved for {}", addr),
            ))
        })?;

    let socket = tuned_socket(socket_addr)?;

    // socket2 connect is blocking; connect before switching to non-blocking.
    let tcp_stream = timeout(
        config.connect_timeout,
        tokio::task::spawn_blocking(move || -> std::io::Result<std::net::TcpStream> {
            socket.connect(&socket_addr.into())?;
            socket.set_nonblocking(true)?;
            Ok(socket.into())
        }),
    )
    .await
    .map_err(|_| NntpError::Timeout)?
    .map_err(|e| NntpError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
    .map_err(NntpError::Io)?;

    Ok(TcpStream::from_std(tcp_stream)?)
}

/// Create a TCP socket with NODELAY and enlarged buffers
///
/// Buffer sizes are best effort; the OS may clamp them.
fn tuned_socket(addr: SocketAddr) -> Result<socket2::Socket> {
    use socket2::{Domain, Protocol, Socket, Type};

    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Request/response traffic: send small command packets immediately.
    socket.set_nodelay(true)?;

    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        warn!(
            "Failed to set receive buffer size to {} bytes: {}",
            RECV_BUFFER_SIZE, e
        );
    } else if let Ok(actual_size) = socket.recv_buffer_size() {
        debug!(
            "TCP receive buffer: requested {} bytes, actual {} bytes",
            RECV_BUFFER_SIZE, actual_size
        );
    }

    if let Err(e) = socket.set_send_buffer_size(SEND_BUFFER_SIZE) {
        warn!(
            "Failed to set send buffer size to {} bytes: {}",
            SEND_BUFFER_SIZE, e
        );
    }

    Ok(socket)
}

/// Rustls client configuration for `config`
fn tls_client_config(config: &ServerConfig) -> ClientConfig {
    use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
    // Ignore the error: another part of the process may have installed one.
    let _ = CryptoProvider::install_default(ring::default_provider());

    if config.allow_insecure_tls {
        warn!("TLS certificate validation disabled - connection vulnerable to MITM attacks");
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousAcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

/// Wrap `tcp_stream` in TLS, verifying against `config.host`
async fn handshake_tls(
    config: &ServerConfig,
    tcp_stream: TcpStream,
) -> Result<tokio_rustls::client::TlsStream<TcpStream>> {
    let connector = TlsConnector::from(Arc::new(tls_client_config(config)));
    let server_name = ServerName::try_from(config.host.as_str())
        .map_err(|e| NntpError::Tls(format!("Invalid domain: {}", e)))?
        .to_owned();

    timeout(
        config.connect_timeout,
        connector.connect(server_name, tcp_stream),
    )
    .await
    .map_err(|_| NntpError::Timeout)?
    .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {}", e)))
}
