//! ListInviteCodesHandler - Query handler for codes that are not disabled.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::invites::InviteCode;
use crate::ports::InviteCodeRepository;

/// Query for all non-disabled codes, newest first.
///
/// Expired and exhausted codes are included; presentation filters them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListInviteCodesQuery;

pub struct ListInviteCodesHandler {
    repository: Arc<dyn InviteCodeRepository>,
}

impl ListInviteCodesHandler {
    pub fn new(repository: Arc<dyn InviteCodeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, _query: ListInviteCodesQuery) -> Result<Vec<InviteCode>, AccessError> {
        Ok(self.repository.list_active().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::domain::foundation::Timestamp;
    use crate::domain::invites::NewInviteCode;

    #[tokio::test]
    async fn lists_expired_but_not_disabled_codes() {
        let dir = InMemoryAccessDirectory::new();
        let yesterday = Timestamp::now().minus_days(1);
        dir.save(&NewInviteCode::new("OLD".into(), "plex".into(), None, Some(yesterday), None).unwrap())
            .await
            .unwrap();
        let off = dir
            .save(&NewInviteCode::new("OFF".into(), "plex".into(), None, None, None).unwrap())
            .await
            .unwrap();
        dir.disable(off.id).await.unwrap();

        let codes = ListInviteCodesHandler::new(Arc::new(dir))
            .handle(ListInviteCodesQuery)
            .await
            .unwrap();

        let names: Vec<_> = codes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(names, vec!["OLD"]);
    }
}
