use log::info;
use std::error::Error;
use std::time::Duration;
use tokio::io::{ AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader };

use crate::cli::ChatArgs;
use super::transport::{ HttpRelayTransport, RelayTransport };
use super::{ render_message, ChatSession, SubmitRejected, TYPING_INDICATOR };

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

pub async fn run(args: &ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transport = HttpRelayTransport::new(
        &args.relay_url,
        Duration::from_secs(args.relay_timeout_secs)
    )?;
    info!("Chatting with relay at: {}", transport.endpoint());

    let session = ChatSession::new(transport);
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(session, stdin, tokio::io::stdout()).await
}

/// Drives a session from `input` lines until EOF or a quit command.
pub async fn run_session<T, R, W>(
    mut session: ChatSession<T>,
    input: R,
    mut output: W
) -> Result<(), Box<dyn Error + Send + Sync>>
    where T: RelayTransport, R: tokio::io::AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    for line in session.render() {
        output.write_all(format!("{}\n", line).as_bytes()).await?;
    }

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }

        session.set_input(line);
        let pending = match session.begin_submit() {
            Ok(pending) => pending,
            Err(SubmitRejected::Empty) => {
                continue;
            }
            Err(SubmitRejected::Busy) => {
                output.write_all(b"Still waiting for the last answer.\n").await?;
                continue;
            }
        };

        output.write_all(format!("{}\n", TYPING_INDICATOR).as_bytes()).await?;
        output.flush().await?;

        let result = session.transport().send(&pending.to_request()).await;
        if let Some(reply) = session.finish(result) {
            let rendered = render_message(reply);
            output.write_all(format!("{}\n\n", rendered).as_bytes()).await?;
        }
    }

    output.flush().await?;
    Ok(())
}
