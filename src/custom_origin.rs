//! Local secure origin for development.
//!
//! Full PWA functionality (service workers, add-to-homescreen) only works on
//! a trusted HTTPS origin, so each project gets its own hostname under the
//! `.local.pwadev` development domain plus a self-signed certificate issued
//! with the local openssl toolchain. Certificates live user-level so a
//! reprovisioned project reuses them; the project records its origin in
//! `.buildpack/custom-origin.json`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Development TLD all provisioned hostnames live under.
pub const DEV_DOMAIN: &str = "local.pwadev";

const CERT_DAYS: &str = "825";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomOrigin {
    pub host: String,
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Hostname for a project, derived from its name: lowercased, runs of
/// non-alphanumerics collapsed to single dashes, under [`DEV_DOMAIN`].
pub fn unique_hostname(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    format!("{slug}.{DEV_DOMAIN}")
}

/// Provision a secure origin for the project in `directory` and record it in
/// the project's state directory.
pub fn provision(directory: &Path, name: &str) -> Result<CustomOrigin> {
    let ssl_root = dirs::home_dir()
        .context("could not determine a home directory for the certificate store")?
        .join(".buildpack")
        .join("ssl");
    provision_at(&ssl_root, directory, name)
}

/// As [`provision`], with an explicit certificate store root.
pub fn provision_at(ssl_root: &Path, directory: &Path, name: &str) -> Result<CustomOrigin> {
    let openssl = which::which("openssl")
        .context("openssl is required to issue a custom origin certificate")?;

    let host = unique_hostname(name);
    let host_dir = ssl_root.join(&host);
    fs::create_dir_all(&host_dir)
        .with_context(|| format!("failed to create {}", host_dir.display()))?;

    let cert = host_dir.join("cert.pem");
    let key = host_dir.join("key.pem");
    if !(cert.exists() && key.exists()) {
        issue_certificate(&openssl, &host, &cert, &key)?;
    }

    let origin = CustomOrigin { host, cert, key };
    record_origin(directory, &origin)?;
    Ok(origin)
}

fn issue_certificate(openssl: &Path, host: &str, cert: &Path, key: &Path) -> Result<()> {
    let output = Command::new(openssl)
        .args(["req", "-x509", "-newkey", "rsa:2048", "-nodes", "-days", CERT_DAYS])
        .args(["-subj", &format!("/CN={host}")])
        .args(["-addext", &format!("subjectAltName=DNS:{host}")])
        .arg("-keyout")
        .arg(key)
        .arg("-out")
        .arg(cert)
        .output()
        .context("failed to run openssl")?;

    if !output.status.success() {
        bail!(
            "openssl exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

fn record_origin(directory: &Path, origin: &CustomOrigin) -> Result<()> {
    let state_dir = directory.join(".buildpack");
    fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let path = state_dir.join("custom-origin.json");
    let mut serialized = serde_json::to_string_pretty(origin)?;
    serialized.push('\n');
    fs::write(&path, serialized).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unique_hostname_slugs() {
        assert_eq!(unique_hostname("myapp"), "myapp.local.pwadev");
        assert_eq!(unique_hostname("My Cool Store!"), "my-cool-store.local.pwadev");
        assert_eq!(unique_hostname("--app--"), "app.local.pwadev");
        assert_eq!(unique_hostname("shop_2.0"), "shop-2-0.local.pwadev");
    }

    #[test]
    fn test_provision_records_origin() {
        if which::which("openssl").is_err() {
            return;
        }
        let ssl = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        let origin = provision_at(ssl.path(), project.path(), "myapp").unwrap();
        assert_eq!(origin.host, "myapp.local.pwadev");
        assert!(origin.cert.exists());
        assert!(origin.key.exists());

        let recorded: CustomOrigin = serde_json::from_str(
            &fs::read_to_string(project.path().join(".buildpack/custom-origin.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(recorded.host, origin.host);

        // Reprovisioning reuses the issued certificate.
        let cert_bytes = fs::read(&origin.cert).unwrap();
        provision_at(ssl.path(), project.path(), "myapp").unwrap();
        assert_eq!(fs::read(&origin.cert).unwrap(), cert_bytes);
    }
}
