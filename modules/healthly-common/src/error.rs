/// Placeholder substituted for credentials in error details and logs.
pub const REDACTED: &str = "<HIDDEN>";

/// Replace every occurrence of each secret in `text` with [`REDACTED`].
/// Empty secrets are ignored.
pub fn redact_secrets<S: AsRef<str>>(text: &str, secrets: &[S]) -> String {
    let mut redacted = text.to_string();
    for secret in secrets {
        let secret: &str = secret.as_ref();
        if !secret.is_empty() {
            redacted = redacted.replace(secret, REDACTED);
        }
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_key_in_url() {
        let details = "error sending request for url (https://api.fda.gov/device/510k.json?api_key=abc123&limit=100)";
        let redacted = redact_secrets(details, &["abc123"]);
        assert!(!redacted.contains("abc123"));
        assert!(redacted.contains("api_key=<HIDDEN>"));
    }

    #[test]
    fn redacts_every_secret_and_occurrence() {
        let redacted = redact_secrets("k1 then k2 then k1", &["k1", "k2"]);
        assert_eq!(redacted, "<HIDDEN> then <HIDDEN> then <HIDDEN>");
    }

    #[test]
    fn empty_secret_is_ignored() {
        assert_eq!(redact_secrets("unchanged", &[""]), "unchanged");
    }
}
