use crate::classify::PathDomain;
use crate::cli::OpenArgs;
use crate::config::LaunchConfig;
use crate::session::Session;
use crate::ZedwsError;
use std::process::{Child, Command as ProcessCommand, Stdio};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Build the editor invocation for `path`.
///
/// Foreign paths go through the bridge (`wsl zed /home/u/app`); native paths
/// run the editor directly.
pub fn build_command(path: &str, domain: PathDomain, config: &LaunchConfig) -> ProcessCommand {
    let mut cmd = match domain {
        PathDomain::Foreign => {
            let mut c = ProcessCommand::new(&config.bridge);
            c.arg(&config.editor);
            c
        }
        PathDomain::Native => ProcessCommand::new(&config.editor),
    };
    cmd.arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    cmd
}

/// Spawn the editor and forget about it. Failures are logged, not returned.
pub fn launch(path: &str, domain: PathDomain, config: &LaunchConfig) -> bool {
    let mut cmd = build_command(path, domain, config);
    match cmd.spawn() {
        Ok(child) => {
            log::info!("launch: {:?} ({}) pid {}", path, domain.label(), child.id());
            reap(child);
            true
        }
        Err(e) => {
            log::warn!(
                "launch: {:?} failed for {:?}: {e}",
                cmd.get_program(),
                path
            );
            false
        }
    }
}

// A long-lived rpc session would otherwise collect zombies on Unix.
fn reap(mut child: Child) {
    let spawned = std::thread::Builder::new()
        .name("zedws-reap".into())
        .spawn(move || match child.wait() {
            Ok(status) => log::debug!("launch: pid {} exited {status}", child.id()),
            Err(e) => log::debug!("launch: wait on pid {} failed: {e}", child.id()),
        });
    if let Err(e) = spawned {
        log::debug!("launch: no reaper thread: {e}");
    }
}

pub fn handle_open(session: &Session, args: &OpenArgs) -> Result<(), ZedwsError> {
    if !session.open(&args.path) {
        eprintln!("zedws: could not launch editor for {}", args.path);
    }
    Ok(())
}
