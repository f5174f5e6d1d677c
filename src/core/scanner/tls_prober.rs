// src/core/scanner/tls_prober.rs

use tracing::{debug, error, info};

use crate::core::models::TlsVersion;
use native_tls::{Protocol, TlsConnector};
use openssl::ssl::{SslConnector, SslMethod, SslVersion};
use openssl::x509::X509;
use rustls::client::Resumption;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::task::spawn_blocking;

/// The TLS stack that performs the handshake for one pinned version.
#[derive(Clone, Copy)]
enum Backend {
    /// OpenSSL with the security level lowered so TLS 1.0/1.1 can still be offered.
    Legacy(SslVersion),
    /// The platform library through `native-tls`.
    Native(Protocol),
    /// rustls; `native-tls` cannot pin TLS 1.3.
    Rustls,
}

fn backend(version: TlsVersion) -> Backend {
    match version {
        TlsVersion::Tls10 => Backend::Legacy(SslVersion::TLS1),
        TlsVersion::Tls11 => Backend::Legacy(SslVersion::TLS1_1),
        TlsVersion::Tls12 => Backend::Native(Protocol::Tlsv12),
        TlsVersion::Tls13 => Backend::Rustls,
    }
}

/// Attempts one handshake pinned to exactly `version` and reports whether it
/// completed with a trusted certificate.
///
/// Every failure (DNS, refused connection, handshake alert, untrusted
/// certificate, timeout) is reported as `false`. No retries, and every call
/// builds its own connector so no TLS session can be resumed across probes.
pub async fn probe(host: &str, port: u16, version: TlsVersion, timeout: Duration) -> bool {
    probe_with_roots(host, port, version, timeout, &[]).await
}

/// [`probe`], additionally trusting `extra_roots` next to the built-in roots.
pub async fn probe_with_roots(
    host: &str,
    port: u16,
    version: TlsVersion,
    timeout: Duration,
    extra_roots: &[CertificateDer<'static>],
) -> bool {
    debug!(host, port, %version, "Starting TLS version probe.");

    let attempt = async {
        match backend(version) {
            Backend::Legacy(pinned) => {
                run_blocking(host, extra_roots, move |host, roots| {
                    handshake_legacy(host, port, pinned, roots, timeout)
                })
                .await
            }
            Backend::Native(protocol) => {
                run_blocking(host, extra_roots, move |host, roots| {
                    handshake_native(host, port, protocol, roots, timeout)
                })
                .await
            }
            Backend::Rustls => handshake_tls13(host, port, extra_roots).await,
        }
    };

    let accepted = match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(())) => true,
        Ok(Err(reason)) => {
            debug!(host, %version, reason = %reason, "TLS version rejected.");
            false
        }
        Err(_) => {
            debug!(host, %version, ?timeout, "TLS probe timed out.");
            false
        }
    };

    info!(host, %version, accepted, "TLS version probe finished.");
    accepted
}

/// Runs a synchronous handshake on the blocking pool.
async fn run_blocking<F>(host: &str, extra_roots: &[CertificateDer<'static>], handshake: F) -> Result<(), String>
where
    F: FnOnce(&str, &[CertificateDer<'static>]) -> Result<(), String> + Send + 'static,
{
    let host = host.to_string();
    let roots = extra_roots.to_vec();
    spawn_blocking(move || handshake(&host, &roots))
        .await
        .unwrap_or_else(|e| {
            error!(panic = %e, "Blocking TLS probe task panicked!");
            Err(format!("Task panicked: {}", e))
        })
}

fn handshake_legacy(
    host: &str,
    port: u16,
    version: SslVersion,
    extra_roots: &[CertificateDer<'static>],
    timeout: Duration,
) -> Result<(), String> {
    let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|e| format!("SslConnector Error: {}", e))?;
    builder
        .set_min_proto_version(Some(version))
        .map_err(|e| format!("Protocol pinning Error: {}", e))?;
    builder
        .set_max_proto_version(Some(version))
        .map_err(|e| format!("Protocol pinning Error: {}", e))?;
    // TLS 1.0/1.1 key exchange signs with SHA-1, which OpenSSL 3 only permits at level 0.
    builder
        .set_cipher_list("DEFAULT:@SECLEVEL=0")
        .map_err(|e| format!("Cipher list Error: {}", e))?;
    for der in extra_roots {
        let cert = X509::from_der(&der[..]).map_err(|e| format!("Invalid trust anchor: {}", e))?;
        builder
            .cert_store_mut()
            .add_cert(cert)
            .map_err(|e| format!("Trust store Error: {}", e))?;
    }
    let connector = builder.build();

    let stream = connect_tcp(host, port, timeout).map_err(|e| format!("TCP Connection Error: {}", e))?;

    // Peer and hostname verification stay on: an untrusted handshake is a rejection.
    let mut tls = connector
        .connect(host, stream)
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let _ = tls.shutdown();
    Ok(())
}

fn handshake_native(
    host: &str,
    port: u16,
    protocol: Protocol,
    extra_roots: &[CertificateDer<'static>],
    timeout: Duration,
) -> Result<(), String> {
    let mut builder = TlsConnector::builder();
    builder
        .min_protocol_version(Some(protocol))
        .max_protocol_version(Some(protocol));
    for der in extra_roots {
        let cert = native_tls::Certificate::from_der(&der[..]).map_err(|e| format!("Invalid trust anchor: {}", e))?;
        builder.add_root_certificate(cert);
    }
    let connector = builder.build().map_err(|e| format!("TlsConnector Error: {}", e))?;

    let stream = connect_tcp(host, port, timeout).map_err(|e| format!("TCP Connection Error: {}", e))?;

    let mut tls = connector
        .connect(host, stream)
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let _ = tls.shutdown();
    Ok(())
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))?;
                return Ok(stream);
            }
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

async fn handshake_tls13(host: &str, port: u16, extra_roots: &[CertificateDer<'static>]) -> Result<(), String> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    for der in extra_roots {
        roots
            .add(der.clone())
            .map_err(|e| format!("Invalid trust anchor: {}", e))?;
    }

    let mut config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_protocol_versions(&[&rustls::version::TLS13])
        .map_err(|e| format!("TLS config Error: {}", e))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    config.resumption = Resumption::disabled();

    let server_name = ServerName::try_from(host)
        .map_err(|e| format!("Invalid server name: {}", e))?
        .to_owned();

    let stream = tokio::net::TcpStream::connect((host, port))
        .await
        .map_err(|e| format!("TCP Connection Error: {}", e))?;

    let connector = tokio_rustls::TlsConnector::from(Arc::new(config));
    let mut tls = connector
        .connect(server_name, stream)
        .await
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let _ = tls.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn every_version_is_pinned_by_its_own_backend() {
        assert!(matches!(backend(TlsVersion::Tls10), Backend::Legacy(v) if v == SslVersion::TLS1));
        assert!(matches!(backend(TlsVersion::Tls11), Backend::Legacy(v) if v == SslVersion::TLS1_1));
        assert!(matches!(backend(TlsVersion::Tls12), Backend::Native(Protocol::Tlsv12)));
        assert!(matches!(backend(TlsVersion::Tls13), Backend::Rustls));
    }

    #[tokio::test]
    async fn malformed_trust_anchor_is_false_not_a_panic() {
        let garbage = [CertificateDer::from(vec![0u8, 1, 2, 3])];
        for version in TlsVersion::all() {
            assert!(!probe_with_roots("127.0.0.1", 1, version, Duration::from_secs(1), &garbage).await);
        }
    }

    #[tokio::test]
    async fn refused_connection_is_false_for_every_version() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        for version in TlsVersion::all() {
            assert!(!probe("127.0.0.1", port, version, Duration::from_secs(2)).await);
        }
    }

    #[tokio::test]
    async fn silent_server_times_out_as_false() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => held.push(socket),
                    Err(_) => break,
                }
            }
        });

        let started = std::time::Instant::now();
        assert!(!probe("127.0.0.1", port, TlsVersion::Tls12, Duration::from_millis(300)).await);
        assert!(!probe("127.0.0.1", port, TlsVersion::Tls13, Duration::from_millis(300)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
        server.abort();
    }

    #[tokio::test]
    async fn unresolvable_host_is_false() {
        assert!(!probe("does-not-exist.invalid", 443, TlsVersion::Tls12, Duration::from_secs(2)).await);
    }
}
