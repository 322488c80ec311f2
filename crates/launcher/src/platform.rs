//! Platform-specific game invocation.

use std::path::{Path, PathBuf};

/// Operating system family, as far as launching the game is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// App bundles are started through `open`.
    MacOs,
    /// The game path is executed directly.
    Direct,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Direct
        }
    }
}

/// Program and arguments that start the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Builds the invocation for `game_path` on `platform`.
///
/// On macOS the bundle is opened with `open -W -a`, which blocks until the
/// app quits so its exit can be observed.
pub fn resolve_invocation(platform: Platform, game_path: &Path, game_args: &[String]) -> Invocation {
    match platform {
        Platform::MacOs => {
            let mut args = vec![
                "-W".to_string(),
                "-a".to_string(),
                game_path.display().to_string(),
            ];
            if !game_args.is_empty() {
                args.push("--args".to_string());
                args.extend(game_args.iter().cloned());
            }
            Invocation {
                program: PathBuf::from("open"),
                args,
            }
        }
        Platform::Direct => Invocation {
            program: game_path.to_path_buf(),
            args: game_args.to_vec(),
        },
    }
}
