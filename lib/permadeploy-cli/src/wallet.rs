use std::fs;
use std::path::Path;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use tracing::debug;
use turbo::Jwk;

use crate::{CliResult, PermadeployCliError};

/// Reads the wallet credential at `path`.
pub fn load_wallet(path: &Path) -> CliResult<Jwk> {
    if !path.is_file() {
        return Err(PermadeployCliError::MissingWallet(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    let data = String::from_utf8(data).map_err(|_| PermadeployCliError::InvalidWallet)?;
    parse_wallet(&data)
}

/// Parses a wallet given either as JWK JSON or as base64 encoded JWK JSON.
pub fn parse_wallet(input: &str) -> CliResult<Jwk> {
    match serde_json::from_str::<Jwk>(input) {
        Ok(jwk) => return Ok(jwk),
        Err(e) => debug!("wallet is not JWK JSON, trying base64: {e}"),
    }

    let decoded = decode_base64(input).ok_or(PermadeployCliError::InvalidWallet)?;
    serde_json::from_slice::<Jwk>(&decoded).map_err(|_| PermadeployCliError::InvalidWallet)
}

// accepts wrapped lines as well as the url-safe alphabet
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    STANDARD
        .decode(&compact)
        .or_else(|_| URL_SAFE_NO_PAD.decode(compact.trim_end_matches('=')))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use base64::Engine;
    use tempfile::TempDir;
    use test_case::test_case;

    use crate::wallet::{load_wallet, parse_wallet};
    use crate::PermadeployCliError;

    const WALLET_JSON: &str = r#"{"kty":"RSA","n":"AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyAhIiMkJSYnKCkqKywtLi8wMTIzNDU2Nzg5Ojs8PT4_QA","e":"AQAB","d":"c2VjcmV0"}"#;

    #[test]
    fn should_parse_json_wallet() {
        let jwk = parse_wallet(WALLET_JSON).unwrap();
        assert_eq!("RSA", jwk.kty);
        assert_eq!(Some("c2VjcmV0".to_string()), jwk.d);
    }

    #[test]
    fn should_parse_base64_wallet() {
        let encoded = STANDARD.encode(WALLET_JSON);
        assert_eq!(parse_wallet(WALLET_JSON).unwrap(), parse_wallet(&encoded).unwrap());
    }

    #[test]
    fn should_parse_wrapped_base64_wallet() {
        let encoded = STANDARD.encode(WALLET_JSON);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(
            parse_wallet(WALLET_JSON).unwrap(),
            parse_wallet(&format!("{wrapped}\n")).unwrap()
        );
    }

    #[test]
    fn should_parse_url_safe_base64_wallet() {
        let encoded = URL_SAFE_NO_PAD.encode(WALLET_JSON);
        assert_eq!(parse_wallet(WALLET_JSON).unwrap(), parse_wallet(&encoded).unwrap());
    }

    #[test_case(""; "empty")]
    #[test_case("not a wallet"; "plain text")]
    #[test_case(r#"{"kty": "RSA"}"#; "incomplete key")]
    #[test_case("eyJmb28iOiAiYmFyIn0="; "base64 json without key")]
    #[test_case("//8="; "base64 binary")]
    fn invalid_wallet_should_return_error(input: &str) {
        assert!(matches!(
            parse_wallet(input),
            Err(PermadeployCliError::InvalidWallet)
        ));
    }

    #[test]
    fn missing_wallet_should_return_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.json");

        assert!(matches!(
            load_wallet(&path),
            Err(PermadeployCliError::MissingWallet(p)) if p == path
        ));

        dir.close().unwrap();
    }

    #[test]
    fn should_load_wallet_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.json");
        fs::write(&path, STANDARD.encode(WALLET_JSON)).unwrap();

        assert_eq!("AQAB", load_wallet(&path).unwrap().e);

        dir.close().unwrap();
    }

    #[test]
    fn non_utf8_wallet_file_should_return_invalid_wallet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            load_wallet(&path),
            Err(PermadeployCliError::InvalidWallet)
        ));

        dir.close().unwrap();
    }
}
