use crate::traits::Interface;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub struct TerminalInterface;

impl TerminalInterface {
    pub fn new() -> Self {
        Self
    }

    async fn write_line(&self, line: &str) {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(line.as_bytes()).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }
}

impl Default for TerminalInterface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interface for TerminalInterface {
    async fn receive_input(&self) -> Option<String> {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        match reader.read_line(&mut line).await {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    async fn send_output(&self, message: &str) {
        self.write_line(&format!("🗂️  {}", message)).await;
    }

    async fn send_with_options(&self, message: &str, options: &[&str]) {
        self.write_line(&format!("🗂️  {}", message)).await;
        if !options.is_empty() {
            self.write_line(&format!("    [{}]", options.join(" / "))).await;
        }
    }

    async fn show_status(&self, status: &str) {
        self.write_line(&format!("…  {}", status)).await;
    }
}
