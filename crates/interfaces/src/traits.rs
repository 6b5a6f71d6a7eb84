use async_trait::async_trait;

/// The conversational surface. Commands, replies, and idle recommendations
/// all travel through one implementation of this trait.
#[async_trait]
pub trait Interface: Send + Sync {
    /// Next line of user input; `None` on end of input.
    async fn receive_input(&self) -> Option<String>;

    /// An assistant reply.
    async fn send_output(&self, message: &str);

    /// An assistant reply with selectable response options (the idle
    /// close/keep recommendation).
    async fn send_with_options(&self, message: &str, options: &[&str]);

    /// Transient state ("thinking…"), not part of the conversation.
    async fn show_status(&self, status: &str);
}
