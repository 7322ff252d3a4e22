//! 行単位で入力を受け付けるコンソール
//!
//! 1行が1コマンド。コマンド名は`CommandTable`で対応するハンドラーに振り分ける。
//! エラーは表示するだけで、ループは継続する。

pub mod dispatch;
pub mod parse;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::library::SharedLibrary;

pub use dispatch::{CommandError, CommandTable, Outcome};

const BANNER: &str = "===== Library Management System =====\nType `help` for a list of commands.";
const PROMPT: &str = "> ";

/// 入力が尽きるか`exit`が実行されるまでコマンドを処理する
///
/// UTF-8として解釈できない行はエラーを表示して読み飛ばす。
pub async fn run<R, W>(library: SharedLibrary, mut input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let table = CommandTable::library();
    let mut buf = Vec::new();

    let greeting = format!("{}\n{}", BANNER, PROMPT);
    output.write_all(greeting.as_bytes()).await?;
    output.flush().await?;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(trim_line_ending(&buf)) {
            Ok(line) => execute(&table, &library, line).await,
            Err(_) => Some("Error: input is not valid UTF-8".to_string()),
        };
        let Some(reply) = reply else {
            output.write_all(b"Exiting program.\n").await?;
            output.flush().await?;
            return Ok(());
        };

        if !reply.is_empty() {
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}

/// 1行を実行して表示する文字列を返す。`exit`なら`None`
async fn execute(table: &CommandTable, library: &SharedLibrary, line: &str) -> Option<String> {
    let tokens = match parse::tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => return Some(format!("Error: {}", e)),
    };

    match table.dispatch(library, &tokens).await {
        Ok(Outcome::Continue(text)) => Some(text),
        Ok(Outcome::Exit) => None,
        Err(e) => {
            tracing::debug!("console command failed: {}", e);
            Some(format!("Error: {}", e))
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
