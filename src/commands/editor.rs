//! External editor and shell integration
//!
//! Launching is fire-and-forget: the commands spawn the tool and return,
//! they never wait for it to exit.

use std::path::Path;

use once_cell::sync::OnceCell;
use tauri::command;

use crate::error::{Result, UndertowError};
use crate::utils::create_command;

/// Editors probed in order of preference
const KNOWN_EDITORS: &[(&str, &str)] = &[
    ("Visual Studio Code", "code"),
    ("Sublime Text", "subl"),
    ("Zed", "zed"),
    ("Vim", "vim"),
];

static RESOLVED_EDITOR: OnceCell<Option<(&'static str, &'static str)>> = OnceCell::new();

/// Check if a command is available on the system
fn is_command_available(command: &str) -> bool {
    #[cfg(target_os = "windows")]
    {
        let output = create_command("where").arg(command).output();
        output.map(|o| o.status.success()).unwrap_or(false)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let output = create_command("which").arg(command).output();
        output.map(|o| o.status.success()).unwrap_or(false)
    }
}

/// Probe for an installed external editor, caching the first hit.
/// Returns the editor's display name and launch command.
pub fn probe_external_editor() -> Option<(&'static str, &'static str)> {
    *RESOLVED_EDITOR.get_or_init(|| {
        KNOWN_EDITORS
            .iter()
            .copied()
            .find(|(_, cmd)| is_command_available(cmd))
    })
}

/// Resolve the external editor to show in the UI, if any is installed
#[command]
pub async fn resolve_external_editor() -> Result<Option<String>> {
    Ok(probe_external_editor().map(|(name, _)| name.to_string()))
}

/// Open one file from the repository in the resolved external editor
#[command]
pub async fn open_file_in_external_editor(repo_path: String, file: String) -> Result<()> {
    let (name, cmd) = probe_external_editor().ok_or(UndertowError::EditorNotFound)?;
    let target = Path::new(&repo_path).join(&file);

    create_command(cmd)
        .arg(&target)
        .spawn()
        .map_err(|e| UndertowError::OperationFailed(format!("Failed to launch {}: {}", name, e)))?;

    Ok(())
}

/// Open a terminal in the repository directory
#[command]
pub async fn open_repository_in_shell(path: String) -> Result<()> {
    let dir = Path::new(&path);
    if !dir.exists() {
        return Err(UndertowError::InvalidPath(path));
    }

    #[cfg(target_os = "windows")]
    {
        create_command("cmd")
            .args(["/c", "start", "cmd"])
            .current_dir(dir)
            .spawn()
            .map_err(|e| {
                UndertowError::OperationFailed(format!("Failed to open terminal: {}", e))
            })?;
    }

    #[cfg(target_os = "macos")]
    {
        create_command("open")
            .args(["-a", "Terminal", dir.to_str().unwrap_or(".")])
            .spawn()
            .map_err(|e| {
                UndertowError::OperationFailed(format!("Failed to open terminal: {}", e))
            })?;
    }

    #[cfg(target_os = "linux")]
    {
        // Try common terminal emulators in order of preference
        let terminals: [(&str, Vec<String>); 5] = [
            ("x-terminal-emulator", vec![]),
            (
                "gnome-terminal",
                vec!["--working-directory".to_string(), path.clone()],
            ),
            ("konsole", vec!["--workdir".to_string(), path.clone()]),
            (
                "xfce4-terminal",
                vec!["--working-directory".to_string(), path.clone()],
            ),
            ("xterm", vec![]),
        ];

        let opened = terminals.iter().any(|(term, args)| {
            create_command(term)
                .args(args)
                .current_dir(dir)
                .spawn()
                .is_ok()
        });

        if !opened {
            return Err(UndertowError::OperationFailed(
                "No terminal emulator found".to_string(),
            ));
        }
    }

    Ok(())
}
