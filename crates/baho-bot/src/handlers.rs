//! Telegram update handlers.

use baho_core::{staff::StaffId, vote::VoteKind};
use teloxide::{
  dispatching::UpdateHandler,
  prelude::*,
  types::{InlineKeyboardButton, InlineKeyboardMarkup},
  utils::command::BotCommands,
};

use crate::{
  client::VoteClient,
  payload::{CallbackData, parse_start_payload},
};

const NO_PAYLOAD: &str = "Please open this bot by scanning a staff QR code 🙂";
const UNREACHABLE: &str = "Could not reach the server";
const REJECTED: &str = "Your rating could not be accepted";
const THANKS: &str = "Thank you! Your rating was received.";
const RECORDED: &str = "Your rating has been recorded 😊";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
  #[command(description = "open the rating menu for a staff member")]
  Start(String),
}

/// The dispatcher tree: `/start` messages and rating button taps.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
  dptree::entry()
    .branch(Update::filter_message().filter_command::<Command>().endpoint(start))
    .branch(Update::filter_callback_query().endpoint(vote))
}

/// One row of three rating buttons.
pub fn rating_keyboard(staff_id: StaffId) -> InlineKeyboardMarkup {
  let button = |label: &str, kind| {
    InlineKeyboardButton::callback(label, CallbackData::new(staff_id, kind).encode())
  };
  InlineKeyboardMarkup::new([[
    button("Excellent 👍", VoteKind::Like),
    button("Good 🙂", VoteKind::Neutral),
    button("Poor 👎", VoteKind::Dislike),
  ]])
}

async fn start(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
  let Command::Start(payload) = cmd;
  match parse_start_payload(&payload) {
    Some(staff_id) => {
      tracing::info!(staff_id, chat_id = msg.chat.id.0, "rating menu opened");
      bot
        .send_message(msg.chat.id, format!("Staff ID: {staff_id}. Choose a rating:"))
        .reply_markup(rating_keyboard(staff_id))
        .await?;
    }
    None => {
      tracing::info!(payload = %payload, chat_id = msg.chat.id.0, "start without staff payload");
      bot.send_message(msg.chat.id, NO_PAYLOAD).await?;
    }
  }
  Ok(())
}

async fn vote(bot: Bot, q: CallbackQuery, client: VoteClient) -> ResponseResult<()> {
  let Some(data) = q.data.as_deref().and_then(CallbackData::parse) else {
    tracing::warn!(data = ?q.data, "malformed callback data");
    bot.answer_callback_query(q.id.clone()).text(REJECTED).show_alert(true).await?;
    return Ok(());
  };

  match client.vote(data.staff_id, data.kind).await {
    Ok(true) => {
      tracing::info!(staff_id = data.staff_id, kind = %data.kind, "vote forwarded");
      bot.answer_callback_query(q.id.clone()).text(THANKS).await?;
      if let Some(message) = q.regular_message() {
        bot.edit_message_text(message.chat.id, message.id, RECORDED).await?;
      }
    }
    Ok(false) => {
      tracing::warn!(staff_id = data.staff_id, kind = %data.kind, "vote refused by server");
      bot.answer_callback_query(q.id.clone()).text(REJECTED).show_alert(true).await?;
    }
    Err(e) => {
      tracing::error!(error = %e, staff_id = data.staff_id, "vote forwarding failed");
      bot.answer_callback_query(q.id.clone()).text(UNREACHABLE).show_alert(true).await?;
    }
  }
  Ok(())
}
