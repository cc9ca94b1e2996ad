use super::AppContext;
use crate::ChatAction;
use anyhow::{Context, Result, bail};
use carenest_core::conversation::{ConversationId, MessageRole};

pub async fn run(ctx: &AppContext, action: ChatAction) -> Result<()> {
    let service = ctx.conversations();

    match action {
        ChatAction::New { message } => {
            let Some(id) = service.create_conversation(&message).await? else {
                bail!("Sign in with --user to start a conversation");
            };
            service
                .append_message(&id, MessageRole::User, &message)
                .await
                .context("Conversation created but first message not stored")?;
            println!("{}", id);
        }
        ChatAction::Send {
            conversation,
            message,
            role,
        } => {
            let id = ConversationId::new(conversation);
            let stored = service.append_message(&id, role, &message).await?;
            println!("{} {}", stored.id, stored.created_at.format("%Y-%m-%d %H:%M"));
        }
        ChatAction::List => {
            let conversations = service.list_conversations().await?;
            if conversations.is_empty() {
                println!("No conversations.");
            }
            for conversation in &conversations {
                println!(
                    "{}  {}  {}",
                    conversation.id,
                    conversation.updated_at.format("%Y-%m-%d %H:%M"),
                    conversation.title
                );
            }
        }
        ChatAction::Show { conversation } => {
            let id = ConversationId::new(conversation);
            service.switch_conversation(&id).await?;
            for message in service.active().await.messages {
                println!("[{}] {}", message.role, message.content);
            }
        }
        ChatAction::Delete { conversation } => {
            let id = ConversationId::new(conversation);
            service.delete_conversation(&id).await?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}
