//! External dictionary lookup
//!
//! Drives a browser through AppleScript so each dictionary tab shows the
//! word. Only available on macOS.

use async_trait::async_trait;
use std::process::Output;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomationError {
    #[error("UI scripting is not available on this platform")]
    Unsupported,

    #[error("{0}")]
    Failed(String),

    #[error("script reported an error: {0}")]
    Stderr(String),
}

#[async_trait]
pub trait LookupAdapter: Send + Sync {
    /// Show `word` in the external application. Returns the script's output.
    async fn lookup(&self, word: &str) -> Result<String, AutomationError>;
}

/// Number of dictionary tabs the script cycles through.
const DICTIONARY_TABS: u32 = 3;

pub struct ScriptedBrowserLookup {
    app: String,
}

impl ScriptedBrowserLookup {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }

    /// Focus each dictionary tab in turn, open the command bar, type the
    /// word and submit it.
    pub fn script(&self, word: &str) -> String {
        format!(
            r#"
tell application "{app}"
  activate
  delay 1
  tell application "System Events"
    keystroke "1" using command down
    delay 0.2

    repeat with i from 1 to {tabs}
      keystroke (i as string) using {{control down, shift down}}
      delay 0.5
      keystroke "u" using {{control down, shift down}}
      delay 2
      keystroke "r" using command down
      delay 2
      keystroke "{word}"
      key code 36
      delay 0.2
    end repeat
  end tell
end tell
return "Success"
"#,
            app = escape_applescript(&self.app),
            tabs = DICTIONARY_TABS,
            word = escape_applescript(word),
        )
    }
}

#[async_trait]
impl LookupAdapter for ScriptedBrowserLookup {
    async fn lookup(&self, word: &str) -> Result<String, AutomationError> {
        let script = self.script(word);
        let result = run_osascript(&script).await;

        match &result {
            Ok(output) => tracing::info!(word = %word, output = %output, "External lookup finished"),
            Err(e) => tracing::error!(word = %word, error = %e, "External lookup failed"),
        }

        result
    }
}

#[cfg(target_os = "macos")]
async fn run_osascript(script: &str) -> Result<String, AutomationError> {
    let output = tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .await
        .map_err(|e| AutomationError::Failed(format!("failed to run osascript: {e}")))?;

    interpret(output)
}

#[cfg(not(target_os = "macos"))]
async fn run_osascript(_script: &str) -> Result<String, AutomationError> {
    Err(AutomationError::Unsupported)
}

/// A non-zero exit fails; so does any stderr output, even on success.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn interpret(output: Output) -> Result<String, AutomationError> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        return Err(AutomationError::Failed(if stderr.is_empty() {
            format!("osascript exited with {}", output.status)
        } else {
            stderr
        }));
    }

    if !stderr.is_empty() {
        return Err(AutomationError::Stderr(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_app_and_word() {
        let script = ScriptedBrowserLookup::new("Arc").script("ephemeral");
        assert!(script.contains(r#"tell application "Arc""#));
        assert!(script.contains(r#"keystroke "ephemeral""#));
        assert!(script.contains("repeat with i from 1 to 3"));
        assert!(script.contains("using {control down, shift down}"));
    }

    #[test]
    fn test_script_escapes_quotes() {
        let script = ScriptedBrowserLookup::new("Arc").script(r#"say "hi" \ bye"#);
        assert!(script.contains(r#"keystroke "say \"hi\" \\ bye""#));
    }

    #[cfg(unix)]
    mod output {
        use super::super::*;
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        fn output(code: i32, stdout: &str, stderr: &str) -> Output {
            Output {
                // Wait status: exit code lives in the high byte
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            }
        }

        #[test]
        fn test_success_returns_trimmed_stdout() {
            assert_eq!(interpret(output(0, "Success\n", "")), Ok("Success".to_string()));
        }

        #[test]
        fn test_stderr_is_an_error() {
            assert_eq!(
                interpret(output(0, "", "warning: something\n")),
                Err(AutomationError::Stderr("warning: something".to_string()))
            );
        }

        #[test]
        fn test_non_zero_exit_is_failure() {
            assert_eq!(
                interpret(output(1, "", "execution error")),
                Err(AutomationError::Failed("execution error".to_string()))
            );
            assert!(matches!(
                interpret(output(1, "", "")),
                Err(AutomationError::Failed(_))
            ));
        }
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_lookup_unsupported_off_macos() {
        let adapter = ScriptedBrowserLookup::new("Arc");
        assert_eq!(
            adapter.lookup("word").await,
            Err(AutomationError::Unsupported)
        );
    }
}
