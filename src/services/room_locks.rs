//! # 룸별 잠금 테이블
//!
//! 같은 룸에 대한 체크인 / 주문 추가·수정·삭제 / 체크아웃 / 삭제가 서로 끼어들지 않도록
//! 룸 ID마다 `tokio::sync::Mutex`를 하나씩 둡니다. 서로 다른 룸은 서로를 기다리지 않습니다.
//!
//! 잠금은 같은 프로세스 안의 직렬화만 보장합니다. 프로세스 간 경쟁은
//! DB의 조건부 UPDATE와 트랜잭션이 막습니다.

use dashmap::DashMap; // 샤드 단위로 잠그는 동시성 HashMap
use std::sync::Arc; // 여러 태스크가 같은 값을 공유하기 위한 참조 카운트 포인터
use tokio::sync::{Mutex, OwnedMutexGuard}; // .await를 넘어 들고 있을 수 있는 비동기 Mutex

// Clone: AppState에 넣어 핸들러마다 복제됩니다. Arc라서 같은 테이블을 가리킵니다.
#[derive(Clone, Default)]
pub struct RoomLocks {
    // 룸 ID → 그 룸의 Mutex. 값은 잠글 데이터가 없으므로 `()`입니다.
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 룸 잠금을 얻습니다. 가드가 drop되면 풀립니다.
    ///
    /// DashMap 샤드 잠금은 `Arc`를 복제하는 동안만 잡고, `.await` 전에 놓습니다.
    pub async fn acquire(&self, room_id: &str) -> OwnedMutexGuard<()> {
        // entry(): 처음 보는 룸이면 새 Mutex를 넣습니다. 두 태스크가 동시에 와도 항목은 하나입니다.
        // .clone()으로 Arc만 복제해 꺼내고, 이 문장이 끝나면 샤드 잠금은 풀립니다.
        let lock = self
            .inner
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        // lock_owned(): 가드가 Arc를 직접 들고 있으므로 `&self`의 수명에 묶이지 않습니다.
        lock.lock_owned().await
    }

    /// 삭제된 룸의 잠금 항목을 정리합니다.
    pub fn forget(&self, room_id: &str) {
        // 누가 아직 가드를 들고 있어도 Arc가 살아 있으므로 안전합니다.
        self.inner.remove(room_id);
    }
}
