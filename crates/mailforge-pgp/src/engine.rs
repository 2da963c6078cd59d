//! External OpenPGP tool boundary.
//!
//! The transforms never talk to a cryptographic binary directly; they go
//! through the [`PgpEngine`] capability so tests can substitute a mock.
//! [`GpgTool`] is the production implementation, spawning `gpg` as a
//! synchronous subprocess: the canonicalized body goes to stdin, the armored
//! signature or ciphertext comes back on stdout, and any bytes on stderr fail
//! the operation with the diagnostics preserved.

use crate::error::{Error, Result};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

/// Identity and passphrase for a signing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    /// Signer identity handed to the tool (`-u`).
    pub signer: String,
    /// Loopback passphrase for the signer's key.
    pub passphrase: String,
}

/// Recipients and optional combined signing pass for an encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptRequest {
    /// Recipient addresses, in collection order.
    pub recipients: Vec<String>,
    /// When present, the same invocation also signs as this identity.
    pub sign_as: Option<SignRequest>,
}

/// Capability for producing detached signatures and ciphertext.
///
/// Implementations receive the already CRLF-canonicalized body bytes and
/// return the armored artifact.
pub trait PgpEngine {
    /// Produces a detached armored signature over `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] if the tool reports diagnostics or produces
    /// no output.
    fn sign(&self, body: &[u8], request: &SignRequest) -> Result<Vec<u8>>;

    /// Encrypts `body` to the request's recipients, optionally signing in the
    /// same pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if the tool reports diagnostics or
    /// produces no output.
    fn encrypt(&self, body: &[u8], request: &EncryptRequest) -> Result<Vec<u8>>;
}

/// `gpg` subprocess implementation of [`PgpEngine`].
#[derive(Debug, Clone)]
pub struct GpgTool {
    program: String,
    homedir: PathBuf,
}

impl GpgTool {
    /// Creates a tool invoking `program` with the given trust-store homedir.
    #[must_use]
    pub fn new(program: impl Into<String>, homedir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            homedir: homedir.into(),
        }
    }

    /// Flags common to every invocation: batch mode, the dedicated homedir,
    /// armored output without a version banner.
    fn base_args(&self) -> Vec<String> {
        vec![
            "--batch".to_string(),
            format!("--homedir={}", self.homedir.display()),
            "--no-emit-version".to_string(),
            "--armor".to_string(),
        ]
    }

    fn sign_args(&self, request: &SignRequest) -> Vec<String> {
        let mut args = self.base_args();
        args.extend([
            "--pinentry-mode=loopback".to_string(),
            "--passphrase".to_string(),
            request.passphrase.clone(),
            "--detach-sign".to_string(),
            "--digest-algo=sha256".to_string(),
            "-u".to_string(),
            request.signer.clone(),
        ]);
        args
    }

    fn encrypt_args(&self, request: &EncryptRequest) -> Vec<String> {
        let mut args = self.base_args();
        args.extend([
            "--compress-algo".to_string(),
            "none".to_string(),
            "--digest-algo=sha256".to_string(),
        ]);
        for recipient in &request.recipients {
            args.push("--recipient".to_string());
            // '=' selects exact address matching in the keyring
            args.push(format!("={recipient}"));
        }
        if let Some(sign_as) = &request.sign_as {
            args.extend([
                "--pinentry-mode=loopback".to_string(),
                "--passphrase".to_string(),
                sign_as.passphrase.clone(),
                "-u".to_string(),
                sign_as.signer.clone(),
                "--sign".to_string(),
            ]);
        }
        args.push("--encrypt".to_string());
        args
    }

    /// Runs the tool, feeding `body` to stdin and collecting all channels.
    fn invoke(&self, args: &[String], body: &[u8]) -> std::io::Result<Output> {
        debug!(program = %self.program, ?args, "invoking external OpenPGP tool");
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(body)?;
        }
        child.wait_with_output()
    }

    /// Converts an invocation outcome into the artifact bytes.
    ///
    /// Any diagnostic output, a non-success exit, or an empty artifact is an
    /// error; diagnostics are surfaced in the error, not swallowed.
    fn artifact(output: Output, fail: impl Fn(String) -> Error) -> Result<Vec<u8>> {
        if !output.stderr.is_empty() || !output.status.success() {
            let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %diagnostics, "external tool reported diagnostics");
            let detail = if diagnostics.is_empty() {
                format!("tool exited with {}", output.status)
            } else {
                diagnostics
            };
            return Err(fail(detail));
        }
        if output.stdout.is_empty() {
            return Err(fail("tool produced no output".to_string()));
        }
        Ok(output.stdout)
    }
}

impl Default for GpgTool {
    /// `gpg` with the fixed corpus trust-store directory.
    fn default() -> Self {
        Self::new("gpg", "corpus/OpenPGP/GNUPGHOME")
    }
}

impl PgpEngine for GpgTool {
    fn sign(&self, body: &[u8], request: &SignRequest) -> Result<Vec<u8>> {
        let output = self.invoke(&self.sign_args(request), body)?;
        Self::artifact(output, Error::Signing)
    }

    fn encrypt(&self, body: &[u8], request: &EncryptRequest) -> Result<Vec<u8>> {
        let output = self.invoke(&self.encrypt_args(request), body)?;
        Self::artifact(output, Error::Encryption)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt as _;
    use std::process::ExitStatus;

    fn tool() -> GpgTool {
        GpgTool::new("gpg", "corpus/OpenPGP/GNUPGHOME")
    }

    #[test]
    fn test_sign_args() {
        let args = tool().sign_args(&SignRequest {
            signer: "Alice <alice@example.org>".to_string(),
            passphrase: "_alice_".to_string(),
        });

        assert_eq!(
            args,
            vec![
                "--batch",
                "--homedir=corpus/OpenPGP/GNUPGHOME",
                "--no-emit-version",
                "--armor",
                "--pinentry-mode=loopback",
                "--passphrase",
                "_alice_",
                "--detach-sign",
                "--digest-algo=sha256",
                "-u",
                "Alice <alice@example.org>",
            ]
        );
    }

    #[test]
    fn test_encrypt_args_without_signing() {
        let args = tool().encrypt_args(&EncryptRequest {
            recipients: vec![
                "bob@example.org".to_string(),
                "alice@example.org".to_string(),
            ],
            sign_as: None,
        });

        assert_eq!(
            args,
            vec![
                "--batch",
                "--homedir=corpus/OpenPGP/GNUPGHOME",
                "--no-emit-version",
                "--armor",
                "--compress-algo",
                "none",
                "--digest-algo=sha256",
                "--recipient",
                "=bob@example.org",
                "--recipient",
                "=alice@example.org",
                "--encrypt",
            ]
        );
    }

    #[test]
    fn test_encrypt_args_with_combined_signing() {
        let args = tool().encrypt_args(&EncryptRequest {
            recipients: vec!["bob@example.org".to_string()],
            sign_as: Some(SignRequest {
                signer: "alice@example.org".to_string(),
                passphrase: "_alice_".to_string(),
            }),
        });

        let tail: Vec<&str> = args.iter().map(String::as_str).rev().take(7).collect();
        assert_eq!(
            tail,
            vec![
                "--encrypt",
                "--sign",
                "alice@example.org",
                "-u",
                "_alice_",
                "--passphrase",
                "--pinentry-mode=loopback",
            ]
        );
    }

    #[test]
    fn test_missing_tool_is_io_error() {
        let tool = GpgTool::new("mailforge-no-such-binary", "nowhere");
        let err = tool
            .sign(
                b"body",
                &SignRequest {
                    signer: "alice@example.org".to_string(),
                    passphrase: "_alice_".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_diagnostics_fail_the_artifact() {
        let output = Output {
            status: ExitStatus::from_raw(0),
            stdout: b"ciphertext".to_vec(),
            stderr: b"gpg: key not found\n".to_vec(),
        };
        let err = GpgTool::artifact(output, Error::Encryption).unwrap_err();
        assert!(matches!(err, Error::Encryption(ref d) if d.contains("key not found")));
    }

    #[test]
    fn test_empty_output_fails() {
        let output = Output {
            status: ExitStatus::from_raw(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        let err = GpgTool::artifact(output, Error::Signing).unwrap_err();
        assert!(matches!(err, Error::Signing(ref d) if d.contains("no output")));
    }
}
