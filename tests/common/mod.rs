//! Local TLS fixtures: a throwaway CA, a leaf for `127.0.0.1`/`localhost`
//! signed by it, and a blocking OpenSSL server pinned to a version range.

#![allow(dead_code)]

use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::ssl::{Ssl, SslContext, SslMethod, SslVersion};
use openssl::x509::extension::{BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const CA_NAME: &str = "Sitecheck Test CA";
pub const HOST: &str = "127.0.0.1";

pub struct TestPki {
    pub ca: X509,
    pub leaf: X509,
    pub leaf_key: PKey<Private>,
}

impl TestPki {
    pub fn ca_der(&self) -> Vec<u8> {
        self.ca.to_der().unwrap()
    }
}

fn rsa_key() -> PKey<Private> {
    PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap()
}

fn name(common_name: &str) -> X509Name {
    let mut builder = X509NameBuilder::new().unwrap();
    builder.append_entry_by_text("O", "Sitecheck").unwrap();
    builder.append_entry_by_text("CN", common_name).unwrap();
    builder.build()
}

fn serial() -> Asn1Integer {
    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
    serial.to_asn1_integer().unwrap()
}

/// Validity window starting an hour ago and lasting thirty days.
fn validity() -> (Asn1Time, Asn1Time) {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
    (
        Asn1Time::from_unix((now - 3600) as _).unwrap(),
        Asn1Time::from_unix((now + 30 * 86_400) as _).unwrap(),
    )
}

pub fn test_pki() -> TestPki {
    let (not_before, not_after) = validity();

    let ca_key = rsa_key();
    let mut ca = X509Builder::new().unwrap();
    ca.set_version(2).unwrap();
    ca.set_serial_number(&serial()).unwrap();
    ca.set_subject_name(&name(CA_NAME)).unwrap();
    ca.set_issuer_name(&name(CA_NAME)).unwrap();
    ca.set_not_before(&not_before).unwrap();
    ca.set_not_after(&not_after).unwrap();
    ca.set_pubkey(&ca_key).unwrap();
    ca.append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    ca.append_extension(KeyUsage::new().critical().key_cert_sign().crl_sign().build().unwrap())
        .unwrap();
    ca.sign(&ca_key, MessageDigest::sha256()).unwrap();
    let ca = ca.build();

    let leaf_key = rsa_key();
    let mut leaf = X509Builder::new().unwrap();
    leaf.set_version(2).unwrap();
    leaf.set_serial_number(&serial()).unwrap();
    leaf.set_subject_name(&name("localhost")).unwrap();
    leaf.set_issuer_name(ca.subject_name()).unwrap();
    leaf.set_not_before(&not_before).unwrap();
    leaf.set_not_after(&not_after).unwrap();
    leaf.set_pubkey(&leaf_key).unwrap();
    let san = SubjectAlternativeName::new()
        .dns("localhost")
        .ip(HOST)
        .build(&leaf.x509v3_context(Some(&*ca), None))
        .unwrap();
    leaf.append_extension(san).unwrap();
    leaf.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .build()
            .unwrap(),
    )
    .unwrap();
    leaf.append_extension(ExtendedKeyUsage::new().server_auth().build().unwrap())
        .unwrap();
    leaf.sign(&ca_key, MessageDigest::sha256()).unwrap();

    TestPki { ca, leaf: leaf.build(), leaf_key }
}

/// Serves TLS on `127.0.0.1` with only `min..=max` enabled and returns the port.
///
/// After a completed handshake the server answers one HTTP request with
/// `response`, when given. Failed handshakes just drop the connection.
pub fn serve_tls(pki: &TestPki, min: SslVersion, max: SslVersion, response: Option<&'static str>) -> u16 {
    let mut builder = SslContext::builder(SslMethod::tls_server()).unwrap();
    builder.set_min_proto_version(Some(min)).unwrap();
    builder.set_max_proto_version(Some(max)).unwrap();
    // Level 0 lets the server complete TLS 1.0/1.1 handshakes on OpenSSL 3.
    builder.set_cipher_list("DEFAULT:@SECLEVEL=0").unwrap();
    builder.set_certificate(&pki.leaf).unwrap();
    builder.set_private_key(&pki.leaf_key).unwrap();
    builder.check_private_key().unwrap();
    let context = builder.build();

    let listener = TcpListener::bind((HOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let context = context.clone();
            thread::spawn(move || {
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let Ok(ssl) = Ssl::new(&context) else { return };
                let Ok(mut tls) = ssl.accept(stream) else { return };

                if let Some(response) = response {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match tls.read(&mut buf) {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let _ = tls.write_all(response.as_bytes());
                }
                let _ = tls.shutdown();
            });
        }
    });

    port
}
