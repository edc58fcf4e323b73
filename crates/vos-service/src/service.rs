use std::sync::Arc;

use vos_auth::AuthenticatedContext;
use vos_crypto::ContentHasher;
use vos_protocol::{
    DeleteRequest, DeleteResponse, HistoryRequest, HistoryResponse, ListItem, ListRequest,
    ListResponse, ReadRequest, ReadResponse, VersionInfo, WriteRequest, WriteResponse, WriteStatus,
};
use vos_store::{DeleteOutcome, ObjectStore, PutOutcome, StoredVersion};
use vos_summary::SummaryRegistry;
use vos_types::{validate_kind, ObjectKey, ObjectMeta, RawObject, Timestamp, Version};

use crate::chain;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// The public object surface: Read, Write, Delete, List, History.
///
/// Every operation takes the request's [`AuthenticatedContext`]; the org
/// scope and the audit actor come from it and nowhere else.
pub struct ObjectStoreService {
    store: Arc<dyn ObjectStore>,
    summaries: Arc<SummaryRegistry>,
    config: ServiceConfig,
}

impl ObjectStoreService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        summaries: Arc<SummaryRegistry>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            summaries,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn summaries(&self) -> &SummaryRegistry {
        &self.summaries
    }

    /// Read the head (or a specific version). Absence is `object: None`.
    pub async fn read(
        &self,
        ctx: &AuthenticatedContext,
        req: ReadRequest,
    ) -> ServiceResult<ReadResponse> {
        let key = ObjectKey::parse(&req.kind, &req.uid)?;
        let version = parse_version(req.version.as_deref(), "version")?;

        let Some(stored) = self.store.get(ctx.org_id(), &key, version.as_ref()).await? else {
            tracing::debug!(key = %key, "read: absent");
            return Ok(ReadResponse::default());
        };

        if !ContentHasher::BODY.verify(&stored.body, &stored.meta.etag) {
            tracing::error!(
                key = %key,
                version = %stored.meta.version,
                etag = %stored.meta.etag.short_hex(),
                "stored body does not match its etag"
            );
            return Err(ServiceError::Internal(format!(
                "integrity check failed for {key} version {}",
                stored.meta.version
            )));
        }

        tracing::debug!(key = %key, version = %stored.meta.version, "read");
        Ok(ReadResponse {
            object: Some(RawObject {
                meta: stored.meta,
                body: req.with_body.then_some(stored.body),
            }),
            summary: if req.with_summary { stored.summary } else { None },
        })
    }

    /// Create or update an object under optimistic concurrency.
    pub async fn write(
        &self,
        ctx: &AuthenticatedContext,
        req: WriteRequest,
    ) -> ServiceResult<WriteResponse> {
        let key = ObjectKey::parse(&req.kind, &req.uid)?;
        if req.body.len() > self.config.max_body_bytes {
            return Err(ServiceError::malformed(format!(
                "body is {} bytes, limit is {}",
                req.body.len(),
                self.config.max_body_bytes
            )));
        }
        let expected = parse_version(req.previous_version.as_deref(), "previous_version")?;
        let org = ctx.org_id();

        let existing = self.store.get(org, &key, None).await?;
        let existing_meta = existing.as_ref().map(|s| &s.meta);
        chain::check_precondition(
            &key,
            expected.as_ref(),
            existing_meta.map(|m| &m.version),
        )?;

        let last = self.store.last_minted(org, &key).await?;
        let version = chain::next_version(last.as_ref())?;
        let actor = ctx.actor();
        let audit = chain::stamp_audit(existing_meta, &actor, Timestamp::now());
        let summary = self.summaries.summarize(&key.kind, &req.body);

        let meta = ObjectMeta {
            key: key.clone(),
            version,
            created: audit.created,
            modified: audit.modified,
            created_by: audit.created_by,
            modified_by: audit.modified_by,
            comment: req.comment,
            etag: ContentHasher::BODY.hash(&req.body),
            size: req.body.len() as u64,
        };
        let record = StoredVersion {
            meta: meta.clone(),
            body: req.body,
            summary: summary.clone(),
        };

        match self.store.conditional_put(org, expected.as_ref(), record).await? {
            PutOutcome::Committed => {
                let status = if existing.is_some() {
                    WriteStatus::Updated
                } else {
                    WriteStatus::Created
                };
                tracing::info!(
                    key = %key,
                    version = %meta.version,
                    actor = %actor.login,
                    status = ?status,
                    size = meta.size,
                    "object written"
                );
                Ok(WriteResponse {
                    object: RawObject { meta, body: None },
                    summary,
                    status,
                })
            }
            PutOutcome::Conflict { current } => Err(ServiceError::Conflict {
                key,
                expected,
                current,
            }),
        }
    }

    /// Delete the object and its history if the head is `previous_version`.
    pub async fn delete(
        &self,
        ctx: &AuthenticatedContext,
        req: DeleteRequest,
    ) -> ServiceResult<DeleteResponse> {
        let key = ObjectKey::parse(&req.kind, &req.uid)?;
        if req.previous_version.is_empty() {
            return Err(ServiceError::malformed("previous_version is required"));
        }
        let expected = Version::parse(&req.previous_version)
            .map_err(|e| ServiceError::malformed(format!("previous_version: {e}")))?;

        match self.store.conditional_delete(ctx.org_id(), &key, &expected).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(key = %key, version = %expected, actor = %ctx.principal().login, "object deleted");
                Ok(DeleteResponse { ok: true })
            }
            DeleteOutcome::Conflict { current } => Err(ServiceError::Conflict {
                key,
                expected: Some(expected),
                current,
            }),
        }
    }

    /// Summaries of the head versions of one kind, ordered by uid. Never
    /// returns bodies.
    pub async fn list(
        &self,
        ctx: &AuthenticatedContext,
        req: ListRequest,
    ) -> ServiceResult<ListResponse> {
        validate_kind(&req.kind)?;
        let filter = req.filter;
        let limit = match filter.limit {
            None => self.config.default_list_limit,
            Some(0) => return Err(ServiceError::malformed("limit must be greater than zero")),
            Some(n) if n > self.config.max_list_limit => {
                return Err(ServiceError::malformed(format!(
                    "limit {n} exceeds maximum {}",
                    self.config.max_list_limit
                )))
            }
            Some(n) => n,
        };
        let limit = limit as usize;
        let offset = match filter.continue_token.as_deref() {
            None | Some("") => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ServiceError::malformed("invalid continue_token"))?,
        };

        let heads = self.store.list(ctx.org_id(), &req.kind).await?;
        let mut matching = heads.into_iter().filter(|item| {
            let prefix_ok = filter
                .uid_prefix
                .as_deref()
                .map_or(true, |p| item.meta.key.uid.starts_with(p));
            let labels_ok = filter.labels.is_empty()
                || item
                    .summary
                    .as_ref()
                    .is_some_and(|s| s.matches_labels(&filter.labels));
            prefix_ok && labels_ok
        });

        let items: Vec<ListItem> = matching
            .by_ref()
            .skip(offset)
            .take(limit)
            .map(|item| ListItem {
                key: item.meta.key,
                version: item.meta.version,
                modified: item.meta.modified,
                modified_by: item.meta.modified_by,
                summary: item.summary,
            })
            .collect();
        let more = matching.next().is_some();

        tracing::debug!(kind = %req.kind, count = items.len(), more, "list");
        Ok(ListResponse {
            next_continue_token: more.then(|| (offset + items.len()).to_string()),
            items,
        })
    }

    /// Version chain of an existing object, oldest first.
    pub async fn history(
        &self,
        ctx: &AuthenticatedContext,
        req: HistoryRequest,
    ) -> ServiceResult<HistoryResponse> {
        let key = ObjectKey::parse(&req.kind, &req.uid)?;
        let versions = self
            .store
            .history(ctx.org_id(), &key)
            .await?
            .into_iter()
            .map(|meta| VersionInfo {
                version: meta.version,
                modified: meta.modified,
                modified_by: meta.modified_by,
                comment: meta.comment,
                etag: meta.etag,
                size: meta.size,
            })
            .collect();
        Ok(HistoryResponse { versions })
    }
}

impl std::fmt::Debug for ObjectStoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreService")
            .field("summaries", &self.summaries)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_version(raw: Option<&str>, field: &str) -> ServiceResult<Option<Version>> {
    raw.map(|s| Version::parse(s).map_err(|e| ServiceError::malformed(format!("{field}: {e}"))))
        .transpose()
}
