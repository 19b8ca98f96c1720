//! `watch`: follow the push stream and print one frame per snapshot.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use critterdex_core::{ReconnectConfig, SessionState};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    settings: &Settings,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut session = util::session(settings)?;
    let cancel = CancellationToken::new();
    let stream = session.watch(
        &settings.transport(),
        ReconnectConfig::default(),
        cancel.clone(),
    )?;
    let mut rx = stream.into_receiver();
    let color = output::should_color(&global.color);

    if !global.quiet {
        eprintln!("Watching {} (Ctrl-C to stop)", session.server().base_url());
    }

    let mut rendered = 0usize;
    let mut next: Option<Arc<SessionState>> = None;
    let mut stream_open = true;
    loop {
        let state = match next.take() {
            Some(state) => state,
            None if !stream_open => break,
            None => tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                received = rx.recv() => match received {
                    Ok(state) => state,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "watch fell behind, skipping to latest");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            },
        };

        // Frames render one at a time, so a slow sprite lookup for an older
        // snapshot can never overwrite a newer frame. A newer snapshot or
        // Ctrl-C abandons the render in progress instead of waiting it out.
        let frame = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            received = rx.recv(), if stream_open => {
                match received {
                    Ok(newer) => {
                        tracing::debug!("newer snapshot arrived, dropping render");
                        next = Some(newer);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "watch fell behind, skipping to latest");
                    }
                    Err(RecvError::Closed) => {
                        stream_open = false;
                        next = Some(Arc::clone(&state));
                    }
                }
                continue;
            }
            frame = session.render(&state) => frame,
        };

        let out = output::render_single(
            &global.output,
            &frame,
            |f| output::frame_detail(f, color),
            |f| f.sprite.as_ref().map(ToString::to_string).unwrap_or_default(),
        );
        output::print_output(&out, global.quiet);

        rendered += 1;
        if args.count.is_some_and(|n| rendered >= n) {
            break;
        }
    }

    cancel.cancel();
    Ok(())
}
