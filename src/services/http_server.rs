//! hyper front end for the capability router.
//!
//! Connections are accepted on a tokio runtime; each request is routed on the
//! blocking pool since routing reads files and renders templates.

use std::convert::Infallible;
use std::fs;
use std::io;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::pem::PemObject;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::domain::AppError;
use crate::ports::{ArchiveStore, ScriptRenderer};

use super::capability_router::{CapabilityRouter, Reply};

/// Deadline for a client to finish sending request headers, TLS handshake
/// included.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(3);

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);
const NOT_FOUND_BODY: &str = "404 page not found\n";
const WORKER_FAILED: &str = "Internal server error";

type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// PEM certificate chain and private key for HTTPS.
#[derive(Clone)]
pub struct TlsMaterial {
    pub certificate: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl TlsMaterial {
    pub fn from_files(cert_path: &Path, key_path: &Path) -> Result<Self, AppError> {
        let certificate = fs::read(cert_path).map_err(|err| {
            AppError::config_error(format!(
                "Failed to read SSL certificate {}: {}",
                cert_path.display(),
                err
            ))
        })?;
        let private_key = fs::read(key_path).map_err(|err| {
            AppError::config_error(format!("Failed to read SSL key {}: {}", key_path.display(), err))
        })?;
        Ok(Self { certificate, private_key })
    }

    fn server_config(&self) -> Result<Arc<ServerConfig>, AppError> {
        let certs = CertificateDer::pem_slice_iter(&self.certificate)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                AppError::config_error(format!("Failed to parse SSL certificate: {}", err))
            })?;
        if certs.is_empty() {
            return Err(AppError::config_error("SSL certificate file contains no certificates"));
        }

        let key = PrivateKeyDer::from_pem_slice(&self.private_key)
            .map_err(|err| AppError::config_error(format!("Failed to parse SSL key: {}", err)))?;

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .and_then(|builder| builder.with_no_client_auth().with_single_cert(certs, key))
            .map_err(|err| AppError::config_error(format!("Invalid SSL configuration: {}", err)))?;

        Ok(Arc::new(config))
    }
}

/// Stops a running [`HttpServer`] from another thread.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

/// A bound listener, not yet accepting.
pub struct HttpServer {
    listener: StdTcpListener,
    tls: Option<TlsAcceptor>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl HttpServer {
    /// Bind `addr`, over TLS when `tls` is given.
    pub fn bind(addr: &str, tls: Option<TlsMaterial>) -> Result<Self, AppError> {
        let tls = match tls {
            Some(material) => Some(TlsAcceptor::from(material.server_config()?)),
            None => None,
        };

        let listener = StdTcpListener::bind(addr)
            .and_then(|listener| listener.set_nonblocking(true).map(|()| listener))
            .map_err(|err| AppError::Server(format!("failed to listen on {}: {}", addr, err)))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self { listener, tls, shutdown_tx: Arc::new(shutdown_tx), shutdown_rx })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown_tx))
    }

    /// Serve until shut down. The router and its registry are read-only and
    /// shared by every request.
    pub fn run<S, T>(self, router: Arc<CapabilityRouter<S, T>>) -> Result<(), AppError>
    where
        S: ArchiveStore + Send + Sync + 'static,
        T: ScriptRenderer + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::Server(format!("failed to start runtime: {}", err)))?;

        let result = runtime.block_on(self.accept_loop(router));
        runtime.shutdown_timeout(SHUTDOWN_GRACE);
        info!("server stopped");
        result
    }

    async fn accept_loop<S, T>(self, router: Arc<CapabilityRouter<S, T>>) -> Result<(), AppError>
    where
        S: ArchiveStore + Send + Sync + 'static,
        T: ScriptRenderer + Send + Sync + 'static,
    {
        let Self { listener, tls, shutdown_tx: _shutdown_tx, mut shutdown_rx } = self;
        let listener = TcpListener::from_std(listener)?;
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, tls = tls.is_some(), "listening");
        }

        loop {
            let (stream, _) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                },
                _ = shutdown_rx.changed() => break,
            };

            let router = Arc::clone(&router);
            match &tls {
                None => {
                    tokio::spawn(serve_connection(stream, router));
                }
                Some(acceptor) => {
                    let acceptor = acceptor.clone();
                    tokio::spawn(async move {
                        match timeout(HEADER_READ_TIMEOUT, acceptor.accept(stream)).await {
                            Ok(Ok(stream)) => serve_connection(stream, router).await,
                            Ok(Err(err)) => debug!(error = %err, "TLS handshake failed"),
                            Err(_) => debug!("TLS handshake timed out"),
                        }
                    });
                }
            }
        }

        Ok(())
    }
}

async fn serve_connection<IO, S, T>(io: IO, router: Arc<CapabilityRouter<S, T>>)
where
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: ArchiveStore + Send + Sync + 'static,
    T: ScriptRenderer + Send + Sync + 'static,
{
    let service = service_fn(move |request| {
        let router = Arc::clone(&router);
        async move { Ok::<_, Infallible>(respond(router, request).await) }
    });

    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new()).header_read_timeout(HEADER_READ_TIMEOUT);

    if let Err(err) = builder.serve_connection(TokioIo::new(io), service).await {
        debug!(error = %err, "connection closed");
    }
}

async fn respond<S, T>(
    router: Arc<CapabilityRouter<S, T>>,
    request: Request<Incoming>,
) -> Response<ResponseBody>
where
    S: ArchiveStore + Send + Sync + 'static,
    T: ScriptRenderer + Send + Sync + 'static,
{
    let method = request.method().clone();

    let reply = if method == Method::GET || method == Method::HEAD {
        let target = request
            .uri()
            .path_and_query()
            .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());
        match tokio::task::spawn_blocking(move || router.route(&target)).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "request worker failed");
                Reply::InternalError(WORKER_FAILED)
            }
        }
    } else {
        Reply::NotFound
    };

    // Request paths carry capability keys and are never logged.
    debug!(%method, status = reply.status_code(), "handled request");
    into_response(reply)
}

fn into_response(reply: Reply) -> Response<ResponseBody> {
    match reply {
        Reply::Archive(file) => {
            let length = file.metadata().ok().map(|metadata| metadata.len());
            let stream = ReaderStream::new(tokio::fs::File::from_std(file)).map_ok(Frame::data);
            let mut response = Response::new(StreamBody::new(stream).boxed_unsync());
            response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/x-tar"));
            if let Some(length) = length {
                response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(length));
            }
            response
        }
        Reply::Script(body) => text(StatusCode::OK, body),
        Reply::NotFound => text(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
        Reply::InternalError(message) => {
            text(StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", message))
        }
    }
}

fn text(status: StatusCode, body: impl Into<Bytes>) -> Response<ResponseBody> {
    let body = Full::new(body.into()).map_err(|never| match never {}).boxed_unsync();
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}
