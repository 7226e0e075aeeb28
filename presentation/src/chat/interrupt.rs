//! Ctrl-C cancellation for a running submission

use campaign_chat_application::{ConversationObserver, StreamChatUseCase, SubmitError};
use campaign_chat_domain::{Conversation, SessionOutcome};
use tracing::{debug, warn};

/// Submit `text` and stream the reply, cancelling it on Ctrl-C.
///
/// The session still ends through the controller, so a cancelled reply is
/// rolled back before this returns.
pub async fn submit_interruptible(
    use_case: &StreamChatUseCase,
    conversation: &mut Conversation,
    text: &str,
    observer: &dyn ConversationObserver,
) -> Result<SessionOutcome, SubmitError> {
    let canceller = use_case.canceller();
    let submit = use_case.submit(conversation, text, observer);
    tokio::pin!(submit);

    loop {
        tokio::select! {
            result = &mut submit => return result,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    debug!("Ctrl-C: cancelling reply");
                    canceller.cancel();
                }
                Err(e) => {
                    warn!("Cannot listen for Ctrl-C: {}", e);
                    return submit.await;
                }
            },
        }
    }
}
