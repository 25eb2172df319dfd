//! TLS client configuration in trust-on-first-use mode.
//!
//! Gemini capsules overwhelmingly use self-signed certificates, so the
//! client encrypts the channel without validating the chain against a
//! certificate authority and without matching the host name. Handshake
//! signatures are still verified, so the peer must hold the key for the
//! certificate it presents. Certificate content is not otherwise inspected.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CipherSuite, ClientConfig, DigitallySignedStruct, SignatureScheme, SupportedCipherSuite};

/// Build the client configuration: TLS 1.2 minimum, forward-secret AEAD
/// suites preferred, no certificate authority check.
pub fn tofu_client_config() -> Result<Arc<ClientConfig>, rustls::Error> {
    let mut provider = rustls::crypto::ring::default_provider();

    let preferred: Vec<SupportedCipherSuite> = provider
        .cipher_suites
        .iter()
        .copied()
        .filter(is_preferred_suite)
        .collect();
    if preferred.is_empty() {
        tracing::warn!("No preferred cipher suites available, using provider defaults");
    } else {
        provider.cipher_suites = preferred;
    }

    let provider = Arc::new(provider);
    let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(&[&rustls::version::TLS13, &rustls::version::TLS12])?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(TofuVerifier { provider }))
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// TLS 1.2 suites kept by [`is_preferred_suite`]: ECDHE key exchange with
/// AES-GCM or CHACHA20-POLY1305.
const PREFERRED_TLS12: [CipherSuite; 6] = [
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
];

/// Every TLS 1.3 suite (all AEAD with ephemeral key exchange), plus the
/// forward-secret AEAD suites of TLS 1.2.
pub fn is_preferred_suite(suite: &SupportedCipherSuite) -> bool {
    suite.tls13().is_some() || is_preferred_tls12(suite.suite())
}

fn is_preferred_tls12(suite: CipherSuite) -> bool {
    PREFERRED_TLS12.contains(&suite)
}

/// Accepts any server certificate. Signatures are checked against the
/// provider's algorithms.
#[derive(Debug)]
struct TofuVerifier {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for TofuVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider.signature_verification_algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_config() {
        assert!(tofu_client_config().is_ok());
    }

    #[test]
    fn ring_suites_survive_filter() {
        let provider = rustls::crypto::ring::default_provider();
        let kept: Vec<_> = provider.cipher_suites.iter().filter(|s| is_preferred_suite(s)).collect();
        assert_eq!(kept.len(), provider.cipher_suites.len());
        assert!(kept.iter().any(|s| s.tls13().is_some()));
        assert!(kept.iter().any(|s| s.suite() == CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256));
    }

    #[test]
    fn tls12_rules() {
        assert!(is_preferred_tls12(CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256));
        // TLS_RSA_WITH_AES_128_GCM_SHA256: no forward secrecy.
        assert!(!is_preferred_tls12(CipherSuite::from(0x009c_u16)));
        // TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA: not AEAD.
        assert!(!is_preferred_tls12(CipherSuite::from(0xc013_u16)));
    }
}
