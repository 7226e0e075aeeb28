//! Stream Chat use case.
//!
//! Sends the conversation to the chat backend and assembles the streamed
//! reply into it. Each call is one stream session driven through the
//! [`SessionState`] machine:
//!
//! 1. `Requesting`: open the request (full history as the body)
//! 2. `Streaming`: read chunks one at a time, decode, append deltas
//! 3. `Completed` / `Failed` / `Cancelled`: keep or roll back the reply
//!
//! The read loop is strictly sequential: one chunk is fully decoded and
//! applied before the next one is awaited, so deltas land in wire order.
//! The only suspension points are waiting for the response and waiting for
//! the next chunk; both race against cancellation and the inactivity timeout.

mod session;

pub use session::{SessionCanceller, SubmitError};

use crate::config::StreamParams;
use crate::ports::chat_transport::{ByteStream, ChatRequest, ChatTransport};
use crate::ports::conversation_observer::ConversationObserver;
use campaign_chat_domain::{
    Conversation, FrameDecoder, MessageAssembler, SessionOutcome, SessionState, StreamError,
    StreamEvent,
};
use futures::StreamExt;
use session::{SessionGuard, SessionSlot};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Why the read loop stopped early.
enum Interrupted {
    Cancelled,
    Failed(StreamError),
}

impl From<StreamError> for Interrupted {
    fn from(err: StreamError) -> Self {
        Interrupted::Failed(err)
    }
}

/// Use case for streaming one assistant reply into a conversation.
///
/// Holds the session slot, so one instance serves one chat surface: a
/// second submission while a reply is streaming is rejected or replaces the
/// running one, per [`SessionPolicy`](crate::config::SessionPolicy).
pub struct StreamChatUseCase {
    transport: Arc<dyn ChatTransport>,
    params: StreamParams,
    slot: Arc<SessionSlot>,
}

impl StreamChatUseCase {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            params: StreamParams::default(),
            slot: Arc::new(SessionSlot::default()),
        }
    }

    pub fn with_params(mut self, params: StreamParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    /// Current state of the session machine.
    pub fn state(&self) -> SessionState {
        self.slot.state()
    }

    /// Return a terminal state to `Idle`. No-op in any other state.
    pub fn acknowledge(&self) -> bool {
        self.slot.acknowledge()
    }

    /// Handle for cancelling the active session from another task.
    pub fn canceller(&self) -> SessionCanceller {
        SessionCanceller::new(Arc::clone(&self.slot))
    }

    /// Cancel the active session, if any.
    pub fn cancel(&self) -> bool {
        self.canceller().cancel()
    }

    /// Append the user's message and stream the reply.
    ///
    /// A rejected submission leaves the conversation untouched.
    pub async fn submit(
        &self,
        conversation: &mut Conversation,
        text: impl Into<String>,
        observer: &dyn ConversationObserver,
    ) -> Result<SessionOutcome, SubmitError> {
        let guard = self.slot.begin(self.params.session_policy)?;
        conversation.add_user_message(text);
        observer.on_update(conversation);
        Ok(self.run(guard, conversation, observer).await)
    }

    /// Stream a reply to the conversation as it stands.
    pub async fn stream_reply(
        &self,
        conversation: &mut Conversation,
        observer: &dyn ConversationObserver,
    ) -> Result<SessionOutcome, SubmitError> {
        let guard = self.slot.begin(self.params.session_policy)?;
        Ok(self.run(guard, conversation, observer).await)
    }

    async fn run(
        &self,
        guard: SessionGuard,
        conversation: &mut Conversation,
        observer: &dyn ConversationObserver,
    ) -> SessionOutcome {
        observer.on_state_change(SessionState::Requesting);

        let request = ChatRequest::from_conversation(conversation);
        info!(
            "Session {}: requesting reply ({} messages)",
            guard.id(),
            request.messages.len()
        );

        let body = match self.open(guard.token(), &request).await {
            Ok(body) => body,
            Err(interrupted) => {
                let outcome = match interrupted {
                    Interrupted::Cancelled => SessionOutcome::Cancelled,
                    Interrupted::Failed(err) => SessionOutcome::Failed(err),
                };
                return Self::end(&guard, conversation, observer, outcome);
            }
        };

        guard.transition(SessionState::Streaming);
        observer.on_state_change(SessionState::Streaming);

        let mut assembler = MessageAssembler::on_start(conversation);
        observer.on_update(assembler.conversation());

        let outcome = match self
            .read_loop(guard.token(), body, &mut assembler, observer)
            .await
        {
            Ok(()) => SessionOutcome::Completed {
                content: assembler.on_complete(),
            },
            Err(Interrupted::Cancelled) => {
                assembler.on_error();
                SessionOutcome::Cancelled
            }
            Err(Interrupted::Failed(err)) => {
                assembler.on_error();
                SessionOutcome::Failed(err)
            }
        };

        Self::end(&guard, conversation, observer, outcome)
    }

    /// `Requesting`: send the request and check the status line.
    async fn open(
        &self,
        token: &CancellationToken,
        request: &ChatRequest,
    ) -> Result<ByteStream, Interrupted> {
        let timeout = self.params.inactivity_timeout;

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(Interrupted::Cancelled),
            result = tokio::time::timeout(timeout, self.transport.open(request)) => result,
        };

        let response = match response {
            Err(_) => return Err(StreamError::Timeout(timeout).into()),
            Ok(Err(e)) => return Err(StreamError::Transport(e.to_string()).into()),
            Ok(Ok(response)) => response,
        };

        debug!("Response: {:?}", response);
        if let Some(err) = StreamError::from_status(response.status, response.body.is_some()) {
            return Err(err.into());
        }
        response
            .body
            .ok_or_else(|| StreamError::Transport("response has no body".to_string()).into())
    }

    /// `Streaming`: pull chunks until the sentinel, end of data, or a failure.
    ///
    /// `body` is dropped on return, which closes the connection.
    async fn read_loop(
        &self,
        token: &CancellationToken,
        mut body: ByteStream,
        assembler: &mut MessageAssembler<'_>,
        observer: &dyn ConversationObserver,
    ) -> Result<(), Interrupted> {
        let timeout = self.params.inactivity_timeout;
        let mut decoder =
            FrameDecoder::new().with_max_recovery_attempts(self.params.max_recovery_attempts);
        let mut received: usize = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Interrupted::Cancelled),
                next = tokio::time::timeout(timeout, body.next()) => next,
            };

            let chunk = match next {
                Err(_) => {
                    warn!("Stream: no data for {:?}", timeout);
                    return Err(StreamError::Timeout(timeout).into());
                }
                Ok(None) => break,
                Ok(Some(Err(e))) => return Err(StreamError::Transport(e.to_string()).into()),
                Ok(Some(Ok(chunk))) => chunk,
            };

            received += chunk.len();
            trace!("Stream: chunk of {} bytes ({} total)", chunk.len(), received);

            let events = decoder.push(&chunk).map_err(StreamError::from)?;
            if Self::apply(events, assembler, observer) {
                debug!("Stream: done ({} bytes)", received);
                return Ok(());
            }
        }

        if received == 0 {
            return Err(StreamError::Transport("response body was empty".to_string()).into());
        }

        let events = decoder.finish().map_err(StreamError::from)?;
        Self::apply(events, assembler, observer);
        debug!("Stream: end of data ({} bytes)", received);
        Ok(())
    }

    /// Apply decoded events in order. Returns true once the stream is over.
    fn apply(
        events: Vec<StreamEvent>,
        assembler: &mut MessageAssembler<'_>,
        observer: &dyn ConversationObserver,
    ) -> bool {
        for event in events {
            match event {
                StreamEvent::Delta(text) => {
                    assembler.on_delta(&text);
                    observer.on_update(assembler.conversation());
                }
                StreamEvent::Terminal => return true,
            }
        }
        false
    }

    fn end(
        guard: &SessionGuard,
        conversation: &Conversation,
        observer: &dyn ConversationObserver,
        outcome: SessionOutcome,
    ) -> SessionOutcome {
        match &outcome {
            SessionOutcome::Completed { content } => {
                info!("Session {}: completed ({} bytes)", guard.id(), content.len())
            }
            SessionOutcome::Failed(err) => warn!("Session {}: failed: {}", guard.id(), err),
            SessionOutcome::Cancelled => info!("Session {}: cancelled", guard.id()),
        }

        let state = outcome.state();
        guard.transition(state);
        observer.on_state_change(state);
        observer.on_session_end(conversation, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionPolicy;
    use crate::ports::chat_transport::{ChatResponse, TransportError};
    use async_trait::async_trait;
    use campaign_chat_domain::Message;
    use futures::stream;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    const HEL: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n";
    const LO: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n";
    const DONE: &str = "data: [DONE]\n";

    /// How the scripted body behaves after its chunks run out
    enum Tail {
        End,
        Hang,
        Error(String),
    }

    /// A scripted response for the mock transport
    enum Scripted {
        Response {
            status: u16,
            chunks: Option<Vec<Vec<u8>>>,
            tail: Tail,
        },
        Error(TransportError),
        Hang,
    }

    impl Scripted {
        fn ok(chunks: &[&str]) -> Self {
            Scripted::Response {
                status: 200,
                chunks: Some(chunks.iter().map(|c| c.as_bytes().to_vec()).collect()),
                tail: Tail::End,
            }
        }

        fn ok_then(chunks: &[&str], tail: Tail) -> Self {
            Scripted::Response {
                status: 200,
                chunks: Some(chunks.iter().map(|c| c.as_bytes().to_vec()).collect()),
                tail,
            }
        }

        fn status(status: u16) -> Self {
            Scripted::Response {
                status,
                chunks: None,
                tail: Tail::End,
            }
        }
    }

    /// Mock transport that returns scripted responses in order
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn open(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Response {
                    status,
                    chunks,
                    tail,
                }) => {
                    let body = chunks.map(|chunks| {
                        let head = stream::iter(chunks.into_iter().map(Ok));
                        match tail {
                            Tail::End => head.boxed(),
                            Tail::Hang => head.chain(stream::pending()).boxed(),
                            Tail::Error(e) => head
                                .chain(stream::once(async move { Err(TransportError::Read(e)) }))
                                .boxed(),
                        }
                    });
                    Ok(ChatResponse::new(status, body))
                }
                Some(Scripted::Error(e)) => Err(e),
                Some(Scripted::Hang) => futures::future::pending().await,
                None => Err(TransportError::Connection("no more responses".to_string())),
            }
        }
    }

    /// Records everything published across the UI boundary
    #[derive(Default)]
    struct RecordingObserver {
        states: Mutex<Vec<SessionState>>,
        replies: Mutex<Vec<String>>,
        ended: Mutex<Vec<(Conversation, SessionOutcome)>>,
        cancel_on_first_delta: Option<SessionCanceller>,
    }

    impl RecordingObserver {
        fn cancelling(canceller: SessionCanceller) -> Self {
            Self {
                cancel_on_first_delta: Some(canceller),
                ..Self::default()
            }
        }

        fn states(&self) -> Vec<SessionState> {
            self.states.lock().unwrap().clone()
        }

        fn replies(&self) -> Vec<String> {
            self.replies.lock().unwrap().clone()
        }
    }

    impl ConversationObserver for RecordingObserver {
        fn on_state_change(&self, state: SessionState) {
            self.states.lock().unwrap().push(state);
        }

        fn on_update(&self, conversation: &Conversation) {
            if let Some(reply) = conversation.in_flight() {
                self.replies.lock().unwrap().push(reply.content.clone());
                if !reply.content.is_empty()
                    && let Some(canceller) = &self.cancel_on_first_delta
                {
                    canceller.cancel();
                }
            }
        }

        fn on_session_end(&self, conversation: &Conversation, outcome: &SessionOutcome) {
            self.ended
                .lock()
                .unwrap()
                .push((conversation.clone(), outcome.clone()));
        }
    }

    fn seeded() -> Conversation {
        Conversation::with_messages(vec![
            Message::user("Draft a tagline"),
            Message::assistant("For which product?"),
        ])
    }

    fn after_user(conversation: &Conversation, text: &str) -> Conversation {
        let mut expected = conversation.clone();
        expected.add_user_message(text);
        expected
    }

    async fn submit(
        use_case: &StreamChatUseCase,
        conversation: &mut Conversation,
        observer: &RecordingObserver,
    ) -> SessionOutcome {
        use_case
            .submit(conversation, "Running shoes", observer)
            .await
            .expect("session should start")
    }

    #[tokio::test]
    async fn scenario_a_streams_hello() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[HEL, LO, DONE])]);
        let use_case = StreamChatUseCase::new(transport.clone());
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "Hello".to_string()
            }
        );
        let expected = {
            let mut c = after_user(&seeded(), "Running shoes");
            c.add_assistant_message("Hello");
            c
        };
        assert_eq!(conversation, expected);
        assert_eq!(observer.replies(), vec!["", "Hel", "Hello"]);
        assert_eq!(
            observer.states(),
            vec![
                SessionState::Requesting,
                SessionState::Streaming,
                SessionState::Completed
            ]
        );
        assert_eq!(use_case.state(), SessionState::Completed);
        assert!(use_case.acknowledge());
        assert_eq!(use_case.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn scenario_b_split_inside_json() {
        let combined = format!("{HEL}{LO}");
        let split = combined.find("Hel").unwrap() + 1;
        let (head, tail) = combined.split_at(split);
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[head, tail])]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "Hello".to_string()
            }
        );
        assert_eq!(conversation.last(), Some(&Message::assistant("Hello")));
    }

    #[tokio::test]
    async fn scenario_c_rate_limited_leaves_conversation_unchanged() {
        let transport = ScriptedTransport::new(vec![Scripted::status(429)]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();
        let expected = after_user(&conversation, "Running shoes");

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(outcome, SessionOutcome::Failed(StreamError::RateLimited));
        assert_eq!(conversation, expected);
        assert!(observer.replies().is_empty(), "no reply was ever opened");
        assert_eq!(
            observer.states(),
            vec![SessionState::Requesting, SessionState::Failed]
        );
    }

    #[tokio::test]
    async fn status_classification() {
        let cases = [
            (Scripted::status(402), StreamError::PaymentRequired),
            (
                Scripted::status(500),
                StreamError::Transport("unexpected status 500".to_string()),
            ),
            (
                Scripted::status(200),
                StreamError::Transport("status 200 without a response body".to_string()),
            ),
            (
                Scripted::ok(&[]),
                StreamError::Transport("response body was empty".to_string()),
            ),
        ];

        for (scripted, expected) in cases {
            let use_case = StreamChatUseCase::new(ScriptedTransport::new(vec![scripted]));
            let observer = RecordingObserver::default();
            let mut conversation = seeded();
            let before = after_user(&conversation, "Running shoes");

            let outcome = submit(&use_case, &mut conversation, &observer).await;

            assert_eq!(outcome, SessionOutcome::Failed(expected));
            assert_eq!(conversation, before);
        }
    }

    #[tokio::test]
    async fn connection_error_fails_before_streaming() {
        let transport = ScriptedTransport::new(vec![Scripted::Error(TransportError::Connection(
            "refused".to_string(),
        ))]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failed(StreamError::Transport(ref msg)) if msg.contains("refused")
        ));
        assert!(!observer.states().contains(&SessionState::Streaming));
    }

    #[tokio::test]
    async fn read_error_rolls_back_partial_reply() {
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(
            &[HEL],
            Tail::Error("connection reset".to_string()),
        )]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();
        let before = after_user(&conversation, "Running shoes");

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failed(StreamError::Transport(_))
        ));
        assert_eq!(conversation, before);
        assert_eq!(observer.replies(), vec!["", "Hel"]);
        let ended = observer.ended.lock().unwrap();
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].0, before, "session end sees the rolled-back conversation");
    }

    #[tokio::test]
    async fn unrecoverable_frame_rolls_back() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[HEL, "data: {oops\n", LO])]);
        let use_case = StreamChatUseCase::new(transport)
            .with_params(StreamParams::default().with_max_recovery_attempts(0));
        let observer = RecordingObserver::default();
        let mut conversation = seeded();
        let before = after_user(&conversation, "Running shoes");

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failed(StreamError::Transport(_))
        ));
        assert_eq!(conversation, before);
    }

    #[tokio::test]
    async fn split_frame_recovery_keeps_order() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[
            HEL,
            "data: {\"choices\":[{\"delta\":\n",
            "{\"content\":\"lo\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n",
            DONE,
        ])]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "Hello!".to_string()
            }
        );
        assert_eq!(observer.replies(), vec!["", "Hel", "Hello", "Hello!"]);
    }

    #[tokio::test]
    async fn recovery_and_sentinel_in_one_chunk_completes_on_open_connection() {
        let wire = concat!(
            "data: {\"choices\":[{\"delta\":\n",
            "{\"content\":\"A\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n",
            "data: [DONE]\n",
        );
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(&[wire], Tail::Hang)]);
        let use_case = StreamChatUseCase::new(transport).with_params(
            StreamParams::default().with_inactivity_timeout(Duration::from_millis(200)),
        );
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "AB".to_string()
            }
        );
        assert_eq!(observer.replies(), vec!["", "A", "AB"]);
        assert_eq!(conversation.last(), Some(&Message::assistant("AB")));
    }

    #[tokio::test]
    async fn bytes_after_sentinel_are_ignored() {
        let done_then_more = format!("{DONE}{LO}");
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(
            &[HEL, done_then_more.as_str(), LO],
            Tail::Hang,
        )]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "Hel".to_string()
            }
        );
    }

    #[tokio::test]
    async fn end_of_data_without_sentinel_completes() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[HEL, LO.trim_end()])]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::default();
        let mut conversation = seeded();

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                content: "Hello".to_string()
            }
        );
    }

    #[tokio::test]
    async fn cancel_mid_stream_rolls_back() {
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(&[HEL], Tail::Hang)]);
        let use_case = StreamChatUseCase::new(transport);
        let observer = RecordingObserver::cancelling(use_case.canceller());
        let mut conversation = seeded();
        let before = after_user(&conversation, "Running shoes");

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(conversation, before);
        assert_eq!(use_case.state(), SessionState::Cancelled);
        // Cancelling again, after the session ended, changes nothing.
        assert!(!use_case.cancel());
        assert_eq!(conversation, before);
    }

    #[tokio::test]
    async fn cancel_while_requesting() {
        let transport = ScriptedTransport::new(vec![Scripted::Hang]);
        let use_case = StreamChatUseCase::new(transport);
        let canceller = use_case.canceller();
        let observer = RecordingObserver::default();
        let mut conversation = seeded();
        let before = after_user(&conversation, "Running shoes");

        let (outcome, ()) = tokio::join!(submit(&use_case, &mut conversation, &observer), async {
            while canceller.state() != SessionState::Requesting {
                tokio::task::yield_now().await;
            }
            assert!(canceller.cancel());
            assert!(!canceller.cancel());
        });

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(conversation, before);
        assert_eq!(
            observer.states(),
            vec![SessionState::Requesting, SessionState::Cancelled]
        );
    }

    #[tokio::test]
    async fn inactivity_timeout_fails() {
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(&[HEL], Tail::Hang)]);
        let use_case = StreamChatUseCase::new(transport).with_params(
            StreamParams::default().with_inactivity_timeout(Duration::from_millis(50)),
        );
        let observer = RecordingObserver::default();
        let mut conversation = seeded();
        let before = after_user(&conversation, "Running shoes");

        let outcome = submit(&use_case, &mut conversation, &observer).await;

        assert_eq!(
            outcome,
            SessionOutcome::Failed(StreamError::Timeout(Duration::from_millis(50)))
        );
        assert_eq!(conversation, before);
    }

    #[tokio::test]
    async fn second_submission_is_rejected_while_streaming() {
        let transport = ScriptedTransport::new(vec![Scripted::ok_then(&[HEL], Tail::Hang)]);
        let use_case = StreamChatUseCase::new(transport.clone());
        let canceller = use_case.canceller();
        let observer = RecordingObserver::default();
        let mut first = seeded();
        let mut second = seeded();

        let (outcome, rejected) = tokio::join!(submit(&use_case, &mut first, &observer), async {
            while canceller.state() != SessionState::Streaming {
                tokio::task::yield_now().await;
            }
            let rejected = use_case
                .submit(&mut second, "Another one", &RecordingObserver::default())
                .await;
            canceller.cancel();
            rejected
        });

        assert_eq!(rejected, Err(SubmitError::SessionActive));
        assert_eq!(second, seeded(), "rejected submission leaves conversation alone");
        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_and_replace_policy() {
        let transport = ScriptedTransport::new(vec![
            Scripted::ok_then(&[HEL], Tail::Hang),
            Scripted::ok(&[LO, DONE]),
        ]);
        let use_case = StreamChatUseCase::new(transport).with_params(
            StreamParams::default().with_session_policy(SessionPolicy::CancelAndReplace),
        );
        let canceller = use_case.canceller();
        let observer = RecordingObserver::default();
        let mut first = seeded();
        let mut second = seeded();
        let first_before = after_user(&first, "Running shoes");

        let (first_outcome, second_outcome) =
            tokio::join!(submit(&use_case, &mut first, &observer), async {
                while canceller.state() != SessionState::Streaming {
                    tokio::task::yield_now().await;
                }
                use_case
                    .submit(&mut second, "Trail shoes", &RecordingObserver::default())
                    .await
            });

        assert_eq!(first_outcome, SessionOutcome::Cancelled);
        assert_eq!(first, first_before);
        assert_eq!(
            second_outcome,
            Ok(SessionOutcome::Completed {
                content: "lo".to_string()
            })
        );
        assert_eq!(use_case.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn request_carries_full_history() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[HEL, DONE])]);
        let use_case = StreamChatUseCase::new(transport.clone());
        let mut conversation = seeded();

        let outcome = use_case
            .submit(&mut conversation, "Running shoes", &crate::ports::NoObserver)
            .await;
        assert!(matches!(outcome, Ok(SessionOutcome::Completed { .. })));

        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests[0].messages,
            after_user(&seeded(), "Running shoes").messages()
        );
    }

    #[tokio::test]
    async fn stream_reply_uses_conversation_as_is() {
        let transport = ScriptedTransport::new(vec![Scripted::ok(&[LO, DONE])]);
        let use_case = StreamChatUseCase::new(transport.clone());
        let mut conversation = seeded();
        conversation.add_user_message("Say lo");

        let outcome = use_case
            .stream_reply(&mut conversation, &crate::ports::NoObserver)
            .await;

        assert_eq!(
            outcome,
            Ok(SessionOutcome::Completed {
                content: "lo".to_string()
            })
        );
        assert_eq!(conversation.len(), 4);
        assert_eq!(transport.requests.lock().unwrap()[0].messages.len(), 3);
    }
}
