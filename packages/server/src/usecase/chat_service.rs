//! Chat service: the operation surface the transport layer calls.
//!
//! Each operation runs the matching use case against the shared repository
//! and clock. Operations are synchronous and never block on I/O.

use std::sync::Arc;

use crate::domain::{ChatMessage, ClientId, Clock, MessageContent, RoomId, RoomRepository};

use super::{
    EnterResult, SendResult,
    enter_room::EnterRoomUseCase,
    leave_room::LeaveRoomUseCase,
    query_room::{QueryRoomUseCase, RoomSummary},
    send_message::SendMessageUseCase,
};

#[derive(Clone)]
pub struct ChatService {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl ChatService {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Join a room. See [`EnterRoomUseCase::execute`].
    pub fn enter(&self, room_id: RoomId, client_id: ClientId) -> EnterResult {
        EnterRoomUseCase::new(self.repository.clone(), self.clock.clone())
            .execute(room_id, client_id)
    }

    /// Leave a room; `None` if the client was not a member.
    pub fn leave(&self, room_id: RoomId, client_id: ClientId) -> Option<ChatMessage> {
        LeaveRoomUseCase::new(self.repository.clone(), self.clock.clone())
            .execute(room_id, client_id)
    }

    /// Post a message. Sender membership is not checked.
    pub fn send(
        &self,
        room_id: RoomId,
        client_id: ClientId,
        content: MessageContent,
    ) -> SendResult {
        SendMessageUseCase::new(self.repository.clone(), self.clock.clone())
            .execute(room_id, client_id, content)
    }

    pub fn history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        self.query().history(room_id)
    }

    pub fn participants(&self, room_id: &RoomId) -> Vec<ClientId> {
        self.query().participants(room_id)
    }

    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.query().list_rooms()
    }

    fn query(&self) -> QueryRoomUseCase {
        QueryRoomUseCase::new(self.repository.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Admission, EntryNotices, MAX_PARTICIPANTS, MessageType, Timestamp},
        infrastructure::repository::InMemoryRoomRepository,
        usecase::{EnterError, SendMessageError},
    };
    use std::{
        collections::BTreeSet,
        sync::{
            Barrier,
            atomic::{AtomicI64, Ordering},
        },
        thread,
    };

    /// 呼ばれるたびに 1ms 進む時計
    struct StepClock(AtomicI64);

    impl Clock for StepClock {
        fn now(&self) -> Timestamp {
            Timestamp::new(self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn create_service() -> ChatService {
        ChatService::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(StepClock(AtomicI64::new(1000))),
        )
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn client(name: &str) -> ClientId {
        ClientId::new(name.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    #[test]
    fn test_concurrent_enter_admits_exactly_capacity() {
        // テスト項目: 並行入室でも参加者は上限 4 人ちょうどになる
        // given (前提条件):
        let service = create_service();
        let attempts = 32;

        // when (操作): 32 スレッドが別々の ID で同時に入室
        let results: Vec<EnterResult> = thread::scope(|s| {
            let handles: Vec<_> = (0..attempts)
                .map(|i| {
                    let service = service.clone();
                    s.spawn(move || service.enter(room("race"), client(&format!("user-{i}"))))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // then (期待する結果):
        let joined = results.iter().filter(|r| r.is_joined()).count();
        let full = results
            .iter()
            .filter(|r| r.outcome == Err(EnterError::RoomFull))
            .count();
        assert_eq!(joined, MAX_PARTICIPANTS);
        assert_eq!(full, attempts - MAX_PARTICIPANTS);
        assert_eq!(service.participants(&room("race")).len(), MAX_PARTICIPANTS);

        // 成功も失敗も履歴に残る
        let history = service.history(&room("race"));
        assert_eq!(history.len(), attempts);
        assert_eq!(
            history
                .iter()
                .filter(|m| m.message_type == MessageType::Enter)
                .count(),
            MAX_PARTICIPANTS
        );
    }

    #[test]
    fn test_leave_non_member_changes_nothing() {
        // テスト項目: 参加していないクライアントの退室は履歴を変えずエラーにもならない
        // given (前提条件):
        let service = create_service();
        service.enter(room("taxi"), client("alice"));
        let before = service.history(&room("taxi"));

        // when (操作):
        let message = service.leave(room("taxi"), client("bob"));
        let ghost = service.leave(room("ghost"), client("bob"));

        // then (期待する結果):
        assert!(message.is_none());
        assert!(ghost.is_none());
        assert_eq!(service.history(&room("taxi")), before);
        assert!(service.list_rooms().iter().all(|r| r.id != room("ghost")));
    }

    #[test]
    fn test_duplicate_enter_is_not_counted_twice() {
        // テスト項目: 同じクライアントの 2 回目の入室は ALREADY_JOINED で人数は 1 のまま
        // given (前提条件):
        let service = create_service();
        let first = service.enter(room("taxi"), client("alice"));

        // when (操作):
        let second = service.enter(room("taxi"), client("alice"));

        // then (期待する結果):
        assert!(first.is_joined());
        assert_eq!(second.outcome, Err(EnterError::AlreadyJoined));
        assert!(second.message.is_none());
        assert_eq!(service.participants(&room("taxi")), vec![client("alice")]);
        assert_eq!(service.history(&room("taxi")).len(), 1);
    }

    #[test]
    fn test_send_to_unknown_room_fails_without_creating_it() {
        // テスト項目: 未知のルームへの送信は ROOM_NOT_FOUND でルームを作らない
        // given (前提条件):
        let service = create_service();

        // when (操作):
        let result = service.send(room("ghost-room"), client("bob"), content("hi"));

        // then (期待する結果):
        assert_eq!(result.outcome, Err(SendMessageError::RoomNotFound));
        assert!(service.participants(&room("ghost-room")).is_empty());
        assert!(service.history(&room("ghost-room")).is_empty());
        assert!(service.list_rooms().is_empty());
    }

    #[test]
    fn test_history_follows_call_order() {
        // テスト項目: enter → send → leave の履歴が順番・種別・内容どおりに残る
        // given (前提条件):
        let service = create_service();

        // when (操作):
        service.enter(room("r"), client("a"));
        service.send(room("r"), client("a"), content("hi"));
        service.leave(room("r"), client("a"));

        // then (期待する結果):
        let history = service.history(&room("r"));
        let summary: Vec<(MessageType, &str, &str)> = history
            .iter()
            .map(|m| (m.message_type, m.sender.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (MessageType::Enter, "SYSTEM", "a has entered the room"),
                (MessageType::Talk, "a", "hi"),
                (MessageType::Leave, "SYSTEM", "a has left the room"),
            ]
        );
        let timestamps: Vec<i64> = history.iter().map(|m| m.timestamp.value()).collect();
        assert_eq!(timestamps, vec![1000, 1001, 1002]);
    }

    #[test]
    fn test_queries_on_never_seen_room_are_empty() {
        // テスト項目: 一度も参照されていないルームの参照は空を返す
        // given (前提条件):
        let service = create_service();

        // then (期待する結果):
        assert!(service.history(&room("never-seen")).is_empty());
        assert!(service.participants(&room("never-seen")).is_empty());
    }

    #[test]
    fn test_non_member_can_send_to_existing_room() {
        // テスト項目: 参加していないクライアントでも既存ルームには送信できる
        // given (前提条件):
        let service = create_service();
        service.enter(room("taxi"), client("alice"));

        // when (操作):
        let result = service.send(room("taxi"), client("mallory"), content("hello"));

        // then (期待する結果):
        assert!(result.is_delivered());
        assert_eq!(service.history(&room("taxi")).len(), 2);
    }

    #[test]
    fn test_rejoin_after_leave() {
        // テスト項目: 退室後は再入室でき、満員の部屋も退室で空きができる
        // given (前提条件):
        let service = create_service();
        for name in ["a", "b", "c", "d"] {
            assert!(service.enter(room("taxi"), client(name)).is_joined());
        }
        assert!(!service.enter(room("taxi"), client("e")).is_joined());

        // when (操作):
        service.leave(room("taxi"), client("a"));
        let retry = service.enter(room("taxi"), client("e"));

        // then (期待する結果):
        assert!(retry.is_joined());
        assert_eq!(
            service.participants(&room("taxi")),
            vec![client("b"), client("c"), client("d"), client("e")]
        );
    }

    #[test]
    fn test_rooms_are_independent() {
        // テスト項目: ルームごとに人数上限が独立している
        // given (前提条件):
        let service = create_service();
        for name in ["a", "b", "c", "d"] {
            service.enter(room("taxi-1"), client(name));
        }

        // when (操作): 同じクライアントが別のルームにも入室
        let result = service.enter(room("taxi-2"), client("a"));

        // then (期待する結果):
        assert!(result.is_joined());
        assert_eq!(service.list_rooms().len(), 2);
    }

    /// enter の処理が終わった直後で止まり、合図があるまで呼び出し元に戻らない Repository
    struct PausingRepository {
        inner: InMemoryRoomRepository,
        paused: Barrier,
        resume: Barrier,
    }

    impl RoomRepository for PausingRepository {
        fn enter(&self, room_id: &RoomId, client_id: ClientId, notices: EntryNotices) -> Admission {
            let admission = self.inner.enter(room_id, client_id, notices);
            self.paused.wait();
            self.resume.wait();
            admission
        }

        fn leave(
            &self,
            room_id: &RoomId,
            client_id: &ClientId,
            notice: ChatMessage,
        ) -> Option<ChatMessage> {
            self.inner.leave(room_id, client_id, notice)
        }

        fn append_message(&self, message: ChatMessage) {
            self.inner.append_message(message)
        }

        fn contains_room(&self, room_id: &RoomId) -> bool {
            self.inner.contains_room(room_id)
        }

        fn participants(&self, room_id: &RoomId) -> Vec<ClientId> {
            self.inner.participants(room_id)
        }

        fn history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
            self.inner.history(room_id)
        }

        fn room_ids(&self) -> Vec<RoomId> {
            self.inner.room_ids()
        }
    }

    #[test]
    fn test_leave_during_enter_keeps_history_in_membership_order() {
        // テスト項目: 入室処理の途中に同じクライアントの退室が割り込んでも、
        //             履歴は ENTER → LEAVE の順になる
        // given (前提条件):
        let repository = Arc::new(PausingRepository {
            inner: InMemoryRoomRepository::new(),
            paused: Barrier::new(2),
            resume: Barrier::new(2),
        });
        let service = ChatService::new(
            repository.clone(),
            Arc::new(StepClock(AtomicI64::new(1000))),
        );

        // when (操作): enter が戻る前に別スレッドから leave を実行
        let (entered, left) = thread::scope(|s| {
            let enter = {
                let service = service.clone();
                s.spawn(move || service.enter(room("taxi"), client("a")))
            };
            repository.paused.wait();
            let left = service.leave(room("taxi"), client("a"));
            repository.resume.wait();
            (enter.join().unwrap(), left)
        });

        // then (期待する結果):
        assert!(entered.is_joined());
        assert!(left.is_some());
        let types: Vec<MessageType> = service
            .history(&room("taxi"))
            .iter()
            .map(|m| m.message_type)
            .collect();
        assert_eq!(types, vec![MessageType::Enter, MessageType::Leave]);
        assert!(service.participants(&room("taxi")).is_empty());
    }

    #[test]
    fn test_concurrent_churn_history_replays_membership() {
        // テスト項目: 入退室を並行に繰り返しても、履歴を先頭から再生すると
        //             各時点の参加者集合と矛盾しない
        // given (前提条件):
        let service = create_service();
        let names: Vec<String> = (0..8).map(|i| format!("user-{i}")).collect();

        // when (操作): 8 クライアントがそれぞれ 50 回入退室を繰り返す
        thread::scope(|s| {
            for name in &names {
                let service = service.clone();
                s.spawn(move || {
                    for _ in 0..50 {
                        service.enter(room("churn"), client(name));
                        service.leave(room("churn"), client(name));
                    }
                });
            }
        });

        // then (期待する結果):
        let mut members = BTreeSet::new();
        for message in service.history(&room("churn")) {
            match message.message_type {
                MessageType::Enter => {
                    let name = message.content.trim_end_matches(" has entered the room");
                    assert!(members.insert(name.to_string()), "{name} entered twice");
                    assert!(members.len() <= MAX_PARTICIPANTS);
                }
                MessageType::Leave => {
                    let name = message.content.trim_end_matches(" has left the room");
                    assert!(members.remove(name), "{name} left without entering");
                }
                MessageType::Error => assert_eq!(members.len(), MAX_PARTICIPANTS),
                MessageType::Talk => unreachable!("no talk was sent"),
            }
        }
        assert!(members.is_empty());
        assert!(service.participants(&room("churn")).is_empty());
    }
}
