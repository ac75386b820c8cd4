//! Dependency-ordered resource creation on the destination OLD.

use crate::error::{service_error, UploadError};
use crate::run::UploadRun;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ls2old_domain::relmap::DestinationId;
use ls2old_domain::{
    speaker_key, DestinationService, ResourceKind, StagingStore, DEFAULT_PASSWORD,
    PLACEHOLDER_EMAIL,
};
use serde_json::{json, Value};
use std::fs;

/// Files above this size cannot ride inside a base64 JSON payload and are
/// skipped (20 MiB).
const MAX_JSON_FILE_BYTES: u64 = 20_971_520;

const NOT_NEW_ERROR: &str = "The update request failed because the submitted data were not new.";

/// Configuration for one upload run.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Destination username.
    pub username: String,
    /// Destination password.
    pub password: String,
    /// Source corpus name, used for the migration tag.
    pub corpus: String,
    /// Overwrite pre-existing destination users that match staged ones.
    pub overwrite_users: bool,
    /// Overwrite pre-existing destination speakers that match staged ones.
    pub overwrite_speakers: bool,
}

/// Creates staged resources on a destination service, in dependency order.
pub struct Uploader<D: DestinationService> {
    service: D,
    config: UploadConfig,
}

impl<D: DestinationService> Uploader<D> {
    /// An uploader talking to `service`.
    pub fn new(service: D, config: UploadConfig) -> Uploader<D> {
        Uploader { service, config }
    }

    /// Upload the whole staging store. Returns the run state, including
    /// the relational map and the creation tally.
    pub fn upload(&self, store: &StagingStore) -> Result<UploadRun, UploadError> {
        let mut run = UploadRun::new(&self.config.corpus);
        let authenticated = self
            .service
            .authenticate(&self.config.username, &self.config.password)
            .map_err(service_error)?;
        if !authenticated {
            return Err(UploadError::AuthenticationFailed(self.config.username.clone()));
        }
        tracing::info!(corpus = %self.config.corpus, "uploading staged resources");

        for kind in ResourceKind::UPLOAD_ORDER {
            tracing::debug!(resource = kind.name(), "uploading resource type");
            match kind {
                ResourceKind::ApplicationSettings => {
                    self.upload_application_settings(store, &mut run)?
                }
                ResourceKind::Users => self.upload_users(store, &mut run)?,
                ResourceKind::Speakers => self.upload_speakers(store, &mut run)?,
                ResourceKind::Tags => self.upload_tags(store, &mut run)?,
                ResourceKind::Files => self.upload_files(store, &mut run)?,
                ResourceKind::Forms => self.upload_forms(store, &mut run)?,
                ResourceKind::Corpora => self.upload_corpora(store, &mut run)?,
                ResourceKind::Collections => self.upload_collections(store, &mut run)?,
            }
        }
        tracing::info!(
            forms = run.report.forms_created.len(),
            collections = run.report.collections_created.len(),
            "upload complete"
        );
        Ok(run)
    }

    /// Merge the staged application settings into the destination's most
    /// recent ones and create the result. Existing grammaticalities are
    /// kept when they already cover the staged set.
    fn upload_application_settings(
        &self,
        store: &StagingStore,
        run: &mut UploadRun,
    ) -> Result<(), UploadError> {
        let staged = match store.applicationsettings.first() {
            Some(staged) => staged,
            None => return Ok(()),
        };
        let existing = self
            .service
            .list("applicationsettings")
            .map_err(service_error)?;
        let mut payload = existing.last().cloned().unwrap_or_else(|| json!({}));
        let settings = payload
            .as_object_mut()
            .ok_or(UploadError::MalformedResource { resource: "applicationsettings" })?;

        let existing_grammaticalities: Vec<String> = settings
            .get("grammaticalities")
            .and_then(Value::as_str)
            .unwrap_or("")
            .split(',')
            .map(str::to_owned)
            .collect();
        let staged_grammaticalities: Vec<&str> = staged.grammaticalities.split(',').collect();
        let covered = staged_grammaticalities
            .iter()
            .all(|g| existing_grammaticalities.iter().any(|e| e == g));
        let grammaticalities = if covered {
            existing_grammaticalities.join(",")
        } else {
            staged.grammaticalities.clone()
        };
        settings.insert("grammaticalities".to_owned(), json!(grammaticalities));
        settings.insert(
            "object_language_name".to_owned(),
            json!(staged.object_language_name),
        );

        let response = self
            .service
            .create("applicationsettings", &payload)
            .map_err(service_error)?;
        if created_id(&response).is_none() {
            return Err(UploadError::CreationFailed {
                resource: "applicationsettings",
                key: staged.object_language_name.clone(),
            });
        }
        run.report.applicationsettings_created = true;
        Ok(())
    }

    fn upload_users(&self, store: &StagingStore, run: &mut UploadRun) -> Result<(), UploadError> {
        if store.users.is_empty() {
            return Ok(());
        }
        let existing = self.service.list("users").map_err(service_error)?;
        for user in &store.users {
            let counterpart = existing.iter().find(|u| {
                u.get("username").and_then(Value::as_str) == Some(user.username.as_str())
            });
            match counterpart {
                Some(counterpart) => {
                    let id = resource_id(counterpart, "users")?;
                    if self.config.overwrite_users {
                        let payload = overwrite_user(counterpart, user)?;
                        let response = self
                            .service
                            .update("users", id, &payload)
                            .map_err(service_error)?;
                        if !update_succeeded(&response) {
                            return Err(UploadError::UpdateFailed {
                                resource: "users",
                                key: user.username.clone(),
                            });
                        }
                        run.report.users_updated.push(user.username.clone());
                    }
                    run.map.users.insert(user.username.clone(), id);
                }
                None => {
                    let username = sanitize_username(&user.username)?;
                    if username != user.username {
                        tracing::warn!(
                            original = %user.username,
                            sanitized = %username,
                            "changed an OLD-invalid username"
                        );
                    }
                    let payload = json!({
                        "username": username,
                        "password": DEFAULT_PASSWORD,
                        "password_confirm": DEFAULT_PASSWORD,
                        "first_name": user.first_name,
                        "last_name": user.last_name,
                        "email": user.email,
                        "affiliation": user.affiliation,
                        "role": user.role,
                        "page_content": user.page_content,
                    });
                    let response = self.service.create("users", &payload).map_err(service_error)?;
                    let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                        resource: "users",
                        key: user.username.clone(),
                    })?;
                    // The original source username stays the relational key
                    // even when sanitization renamed the created user.
                    run.map.users.insert(user.username.clone(), id);
                    run.report.users_created.push(user.username.clone());
                }
            }
        }
        Ok(())
    }

    fn upload_speakers(
        &self,
        store: &StagingStore,
        run: &mut UploadRun,
    ) -> Result<(), UploadError> {
        if store.speakers.is_empty() {
            return Ok(());
        }
        let existing = self.service.list("speakers").map_err(service_error)?;
        for speaker in &store.speakers {
            let key = speaker_key(&speaker.first_name, &speaker.last_name);
            let counterpart = existing.iter().find(|s| {
                s.get("first_name").and_then(Value::as_str) == Some(speaker.first_name.as_str())
                    && s.get("last_name").and_then(Value::as_str)
                        == Some(speaker.last_name.as_str())
            });
            match counterpart {
                Some(counterpart) => {
                    let id = resource_id(counterpart, "speakers")?;
                    if self.config.overwrite_speakers {
                        if let Some(payload) = overwrite_speaker(counterpart, speaker)? {
                            let response = self
                                .service
                                .update("speakers", id, &payload)
                                .map_err(service_error)?;
                            if !update_succeeded(&response) {
                                return Err(UploadError::UpdateFailed {
                                    resource: "speakers",
                                    key,
                                });
                            }
                            run.report.speakers_updated.push(id);
                        }
                    }
                    run.map.speakers.insert(key, id);
                }
                None => {
                    let payload = json!({
                        "first_name": speaker.first_name,
                        "last_name": speaker.last_name,
                        "dialect": speaker.dialect,
                        "page_content": speaker.page_content,
                    });
                    let response = self
                        .service
                        .create("speakers", &payload)
                        .map_err(service_error)?;
                    let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                        resource: "speakers",
                        key: key.clone(),
                    })?;
                    run.map.speakers.insert(key, id);
                    run.report.speakers_created.push(id);
                }
            }
        }
        Ok(())
    }

    /// Create the migration tag, then the staged tags. Staged tags whose
    /// names already exist on the destination are reused, not recreated.
    fn upload_tags(&self, store: &StagingStore, run: &mut UploadRun) -> Result<(), UploadError> {
        let payload = json!({
            "name": run.migration_tag_name,
            "description": run.migration_tag_description,
        });
        let response = self.service.create("tags", &payload).map_err(service_error)?;
        let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
            resource: "tags",
            key: run.migration_tag_name.clone(),
        })?;
        run.migration_tag_id = Some(id);
        run.map.tags.insert(run.migration_tag_name.clone(), id);
        run.report.tags_created.push(id);

        if store.tags.is_empty() {
            return Ok(());
        }
        let existing = self.service.list("tags").map_err(service_error)?;
        for tag in &store.tags {
            let counterpart = existing
                .iter()
                .find(|t| t.get("name").and_then(Value::as_str) == Some(tag.name.as_str()));
            match counterpart {
                Some(counterpart) => {
                    let id = resource_id(counterpart, "tags")?;
                    run.map.tags.insert(tag.name.clone(), id);
                }
                None => {
                    let payload = json!({
                        "name": tag.name,
                        "description": tag.description,
                    });
                    let response =
                        self.service.create("tags", &payload).map_err(service_error)?;
                    let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                        resource: "tags",
                        key: tag.name.clone(),
                    })?;
                    run.map.tags.insert(tag.name.clone(), id);
                    run.report.tags_created.push(id);
                }
            }
        }
        Ok(())
    }

    /// Create the files whose content was materialized locally. The file
    /// ids are recorded per source datum, for the forms' `files` values.
    fn upload_files(&self, store: &StagingStore, run: &mut UploadRun) -> Result<(), UploadError> {
        for file in &store.files {
            let path = match &file.local_path {
                Some(path) => path,
                None => {
                    tracing::warn!(url = %file.source_url, "staged file has no local path");
                    continue;
                }
            };
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "staged file is missing on disk");
                continue;
            }
            let data = fs::read(path)?;
            if data.len() as u64 > MAX_JSON_FILE_BYTES {
                // TODO: multipart upload for files over 20 MiB; the JSON
                // body route rejects them.
                tracing::warn!(
                    path = %path.display(),
                    size = data.len(),
                    "file too large for a base64 JSON upload; skipped"
                );
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&file.filename);
            let payload = json!({
                "filename": filename,
                "MIME_type": file.mime_type,
                "description": file.description,
                "base64_encoded_file": BASE64.encode(&data),
            });
            let response = self.service.create("files", &payload).map_err(service_error)?;
            let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                resource: "files",
                key: filename.to_owned(),
            })?;
            run.map
                .files
                .entry(file.source_datum_id.clone())
                .or_default()
                .push(id);
            run.report.files_created.push(id);
        }
        Ok(())
    }

    /// Create the forms. Trashed source datums are created and immediately
    /// deleted, so the destination has a record of them without exposing
    /// them; they never enter the relational map.
    fn upload_forms(&self, store: &StagingStore, run: &mut UploadRun) -> Result<(), UploadError> {
        if store.forms.is_empty() {
            return Ok(());
        }
        let migration_tag_id = run.migration_tag_id()?;
        for form in &store.forms {
            let mut tag_ids = resolve_tags(&form.tags, run);
            tag_ids.push(migration_tag_id);
            let speaker = form
                .speaker
                .as_ref()
                .and_then(|s| lookup_speaker(&speaker_key(&s.first_name, &s.last_name), run));
            let elicitor = form.elicitor.as_ref().and_then(|u| lookup_user(&u.username, run));
            let files: Vec<DestinationId> = if form.has_files {
                match run.map.files.get(&form.source_datum_id) {
                    Some(ids) => ids.clone(),
                    None => {
                        tracing::warn!(
                            datum = %form.source_datum_id,
                            "no OLD file ids for the form's source datum"
                        );
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };
            let payload = json!({
                "transcription": form.transcription,
                "phonetic_transcription": form.phonetic_transcription,
                "morpheme_break": form.morpheme_break,
                "grammaticality": form.grammaticality,
                "morpheme_gloss": form.morpheme_gloss,
                "translations": form.translations,
                "comments": form.comments,
                "syntax": form.syntax,
                "status": form.status,
                "date_elicited": form.date_elicited,
                "speaker": speaker,
                "elicitor": elicitor,
                "tags": tag_ids,
                "files": files,
            });
            let response = self.service.create("forms", &payload).map_err(service_error)?;
            let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                resource: "forms",
                key: form.source_datum_id.clone(),
            })?;
            run.report.forms_created.push(id);
            if form.deleted {
                let response = self.service.delete("forms", id).map_err(service_error)?;
                if created_id(&response).is_none() {
                    return Err(UploadError::DeletionFailed(form.source_datum_id.clone()));
                }
                run.report.forms_deleted.push(id);
            } else {
                run.map.forms.insert(form.source_datum_id.clone(), id);
            }
        }
        Ok(())
    }

    /// Create the corpora. A corpus's content is the comma-joined list of
    /// destination form ids its datalist referenced.
    fn upload_corpora(&self, store: &StagingStore, run: &mut UploadRun) -> Result<(), UploadError> {
        if store.corpora.is_empty() {
            return Ok(());
        }
        let migration_tag_id = run.migration_tag_id()?;
        for corpus in &store.corpora {
            let mut tag_ids = resolve_tags(&corpus.tags, run);
            tag_ids.push(migration_tag_id);
            let mut form_ids = Vec::new();
            for datum_id in &corpus.source_datum_ids {
                match run.map.forms.get(datum_id) {
                    Some(id) => form_ids.push(id.to_string()),
                    None => tracing::warn!(
                        datum = %datum_id,
                        corpus = %corpus.name,
                        "no OLD form id for a datalist entry; the corpus will be incomplete"
                    ),
                }
            }
            let payload = json!({
                "name": corpus.name,
                "description": corpus.description,
                "content": form_ids.join(", "),
                "tags": tag_ids,
            });
            let response = self.service.create("corpora", &payload).map_err(service_error)?;
            let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                resource: "corpora",
                key: corpus.source_datalist_id.clone(),
            })?;
            run.map.corpora.insert(corpus.source_datalist_id.clone(), id);
            run.report.corpora_created.push(id);
        }
        Ok(())
    }

    /// Create the collections. A collection's contents are `form[<id>]`
    /// references to the forms of its source session, in entry order.
    fn upload_collections(
        &self,
        store: &StagingStore,
        run: &mut UploadRun,
    ) -> Result<(), UploadError> {
        if store.collections.is_empty() {
            return Ok(());
        }
        let migration_tag_id = run.migration_tag_id()?;
        for collection in &store.collections {
            let mut tag_ids = resolve_tags(&collection.tags, run);
            tag_ids.push(migration_tag_id);
            let speaker = collection
                .speaker
                .as_ref()
                .and_then(|s| lookup_speaker(&speaker_key(&s.first_name, &s.last_name), run));
            let elicitor = collection
                .elicitor
                .as_ref()
                .and_then(|u| lookup_user(&u.username, run));

            // Datums are ordered within their session by entry date, so the
            // collection replays that order.
            let mut entries: Vec<(String, DestinationId)> = Vec::new();
            for form in &store.forms {
                if form.deleted
                    || form.source_session_id.as_deref() != Some(&collection.source_session_id)
                {
                    continue;
                }
                match run.map.forms.get(&form.source_datum_id) {
                    Some(id) => {
                        entries.push((form.date_entered.clone().unwrap_or_default(), *id))
                    }
                    None => tracing::warn!(
                        datum = %form.source_datum_id,
                        "no OLD form id for a session datum"
                    ),
                }
            }
            if entries.is_empty() {
                tracing::warn!(title = %collection.title, "collection has no contents");
            }
            entries.sort();
            let contents = entries
                .iter()
                .map(|(_, id)| format!("form[{}]", id))
                .collect::<Vec<_>>()
                .join("\n");

            let payload = json!({
                "title": collection.title,
                "type": collection.collection_type,
                "description": collection.description,
                "date_elicited": collection.date_elicited,
                "speaker": speaker,
                "elicitor": elicitor,
                "tags": tag_ids,
                "contents": contents,
            });
            let response = self
                .service
                .create("collections", &payload)
                .map_err(service_error)?;
            let id = created_id(&response).ok_or_else(|| UploadError::CreationFailed {
                resource: "collections",
                key: collection.source_session_id.clone(),
            })?;
            run.map
                .collections
                .insert(collection.source_session_id.clone(), id);
            run.report.collections_created.push(id);
        }
        Ok(())
    }
}

fn created_id(response: &Value) -> Option<DestinationId> {
    response.get("id").and_then(Value::as_i64)
}

fn resource_id(resource: &Value, kind: &'static str) -> Result<DestinationId, UploadError> {
    created_id(resource).ok_or(UploadError::MalformedResource { resource: kind })
}

fn update_succeeded(response: &Value) -> bool {
    created_id(response).is_some()
        || response.get("error").and_then(Value::as_str) == Some(NOT_NEW_ERROR)
}

fn resolve_tags(tags: &[ls2old_domain::Tag], run: &UploadRun) -> Vec<DestinationId> {
    tags.iter()
        .filter_map(|tag| match run.map.tags.get(&tag.name) {
            Some(id) => Some(*id),
            None => {
                tracing::warn!(tag = %tag.name, "no OLD id for tag");
                None
            }
        })
        .collect()
}

fn lookup_speaker(key: &str, run: &UploadRun) -> Option<DestinationId> {
    let id = run.map.speakers.get(key).copied();
    if id.is_none() {
        tracing::warn!(speaker = %key, "no OLD id for speaker");
    }
    id
}

fn lookup_user(username: &str, run: &UploadRun) -> Option<DestinationId> {
    let id = run.map.users.get(username).copied();
    if id.is_none() {
        tracing::warn!(user = %username, "no OLD id for elicitor");
    }
    id
}

/// Strip characters the OLD rejects in usernames (anything outside ASCII
/// word characters). An empty result is fatal.
fn sanitize_username(username: &str) -> Result<String, UploadError> {
    let sanitized: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if sanitized.is_empty() {
        return Err(UploadError::InvalidUsername(username.to_owned()));
    }
    Ok(sanitized)
}

/// The update payload for a pre-existing user: the counterpart overlaid
/// with the staged values that are trustworthy. Passwords are never
/// changed and a placeholder email never overwrites a real one.
fn overwrite_user(
    counterpart: &Value,
    user: &ls2old_domain::User,
) -> Result<Value, UploadError> {
    let mut payload = counterpart.clone();
    let fields = payload
        .as_object_mut()
        .ok_or(UploadError::MalformedResource { resource: "users" })?;
    let counterpart_username = fields
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    if user.first_name != counterpart_username {
        fields.insert("first_name".to_owned(), json!(user.first_name));
    }
    if user.last_name != counterpart_username {
        fields.insert("last_name".to_owned(), json!(user.last_name));
    }
    if user.email != PLACEHOLDER_EMAIL {
        fields.insert("email".to_owned(), json!(user.email));
    }
    if !user.affiliation.is_empty() {
        fields.insert("affiliation".to_owned(), json!(user.affiliation));
    }
    fields.insert("role".to_owned(), json!(user.role));
    if !user.page_content.is_empty() {
        fields.insert("page_content".to_owned(), json!(user.page_content));
    }
    fields.insert("password".to_owned(), json!(""));
    fields.insert("password_confirm".to_owned(), json!(""));
    Ok(payload)
}

/// The update payload for a pre-existing speaker, or `None` when the
/// staged speaker adds nothing.
fn overwrite_speaker(
    counterpart: &Value,
    speaker: &ls2old_domain::Speaker,
) -> Result<Option<Value>, UploadError> {
    let mut payload = counterpart.clone();
    let fields = payload
        .as_object_mut()
        .ok_or(UploadError::MalformedResource { resource: "speakers" })?;
    let mut changed = false;
    if fields.get("dialect").and_then(Value::as_str) != Some(speaker.dialect.as_str()) {
        fields.insert("dialect".to_owned(), json!(speaker.dialect));
        changed = true;
    }
    if !speaker.page_content.is_empty()
        && fields.get("page_content").and_then(Value::as_str)
            != Some(speaker.page_content.as_str())
    {
        fields.insert("page_content".to_owned(), json!(speaker.page_content));
        changed = true;
    }
    Ok(changed.then_some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls2old_domain::{Collection, Corpus, Form, Speaker, Tag, Translation, User};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::convert::Infallible;

    #[derive(Default)]
    struct MockService {
        calls: RefCell<Vec<(String, String, Value)>>,
        next_id: Cell<i64>,
        listings: HashMap<String, Vec<Value>>,
        reject_credentials: bool,
        fail_creates: Vec<String>,
    }

    impl MockService {
        fn new() -> MockService {
            MockService { next_id: Cell::new(0), ..Default::default() }
        }

        fn with_listing(mut self, resource: &str, items: Vec<Value>) -> MockService {
            self.listings.insert(resource.to_owned(), items);
            self
        }

        fn failing_creates_of(mut self, resource: &str) -> MockService {
            self.fail_creates.push(resource.to_owned());
            self
        }

        fn created(&self, resource: &str) -> Vec<Value> {
            self.calls
                .borrow()
                .iter()
                .filter(|(op, r, _)| op == "create" && r == resource)
                .map(|(_, _, payload)| payload.clone())
                .collect()
        }

        fn call_sequence(&self) -> Vec<(String, String)> {
            self.calls
                .borrow()
                .iter()
                .map(|(op, r, _)| (op.clone(), r.clone()))
                .collect()
        }
    }

    impl DestinationService for &MockService {
        type Error = Infallible;

        fn authenticate(&self, _username: &str, _password: &str) -> Result<bool, Infallible> {
            Ok(!self.reject_credentials)
        }

        fn create(&self, resource: &str, payload: &Value) -> Result<Value, Infallible> {
            self.calls.borrow_mut().push((
                "create".to_owned(),
                resource.to_owned(),
                payload.clone(),
            ));
            if self.fail_creates.iter().any(|r| r == resource) {
                return Ok(json!({"error": "creation rejected"}));
            }
            self.next_id.set(self.next_id.get() + 1);
            let mut response = payload.clone();
            response
                .as_object_mut()
                .unwrap()
                .insert("id".to_owned(), json!(self.next_id.get()));
            Ok(response)
        }

        fn update(&self, resource: &str, id: i64, payload: &Value) -> Result<Value, Infallible> {
            self.calls.borrow_mut().push((
                "update".to_owned(),
                format!("{}/{}", resource, id),
                payload.clone(),
            ));
            Ok(json!({"id": id}))
        }

        fn delete(&self, resource: &str, id: i64) -> Result<Value, Infallible> {
            self.calls.borrow_mut().push((
                "delete".to_owned(),
                format!("{}/{}", resource, id),
                json!(null),
            ));
            Ok(json!({"id": id}))
        }

        fn list(&self, resource: &str) -> Result<Vec<Value>, Infallible> {
            Ok(self.listings.get(resource).cloned().unwrap_or_default())
        }

        fn search(&self, _resource: &str, _query: &Value) -> Result<Vec<Value>, Infallible> {
            Ok(Vec::new())
        }
    }

    fn config() -> UploadConfig {
        UploadConfig {
            username: "admin".to_owned(),
            password: "secret".to_owned(),
            corpus: "testcorpus".to_owned(),
            overwrite_users: false,
            overwrite_speakers: false,
        }
    }

    fn form(datum_id: &str, session_id: &str, date_entered: &str) -> Form {
        Form {
            transcription: "nitsspiyi".to_owned(),
            translations: vec![Translation {
                transcription: "I danced".to_owned(),
                grammaticality: String::new(),
            }],
            status: "tested".to_owned(),
            source_datum_id: datum_id.to_owned(),
            source_session_id: Some(session_id.to_owned()),
            date_entered: Some(date_entered.to_owned()),
            ..Default::default()
        }
    }

    fn populated_store() -> StagingStore {
        let mut store = StagingStore::new();
        store.applicationsettings = vec![ls2old_domain::ApplicationSettings {
            object_language_name: "Blackfoot".to_owned(),
            grammaticalities: "*,?".to_owned(),
        }];
        store.users = vec![User {
            username: "ana".to_owned(),
            first_name: "Ana".to_owned(),
            last_name: "Smith".to_owned(),
            email: "ana@example.com".to_owned(),
            role: "administrator".to_owned(),
            ..Default::default()
        }];
        store.speakers = vec![Speaker {
            first_name: "Dave".to_owned(),
            last_name: "Smith".to_owned(),
            ..Default::default()
        }];
        store.tags = vec![Tag { name: "verbs".to_owned(), ..Default::default() }];
        let mut f = form("d1", "s1", "2014-11-10T02:29:00.000Z");
        f.tags = store.tags.clone();
        f.speaker = Some(store.speakers[0].clone());
        f.elicitor = Some(store.users[0].clone());
        store.forms = vec![f];
        store.corpora = vec![Corpus {
            name: "All data".to_owned(),
            source_datalist_id: "dl1".to_owned(),
            source_datum_ids: vec!["d1".to_owned()],
            ..Default::default()
        }];
        store.collections = vec![Collection {
            title: "Elicit verbs".to_owned(),
            collection_type: "elicitation".to_owned(),
            source_session_id: "s1".to_owned(),
            ..Default::default()
        }];
        store
    }

    #[test]
    fn uploads_in_dependency_order_and_wires_references() {
        let service = MockService::new();
        let run = Uploader::new(&service, config()).upload(&populated_store()).unwrap();

        let sequence = service.call_sequence();
        let creates: Vec<&str> = sequence
            .iter()
            .filter(|(op, _)| op == "create")
            .map(|(_, r)| r.as_str())
            .collect();
        assert_eq!(
            creates,
            vec![
                "applicationsettings",
                "users",
                "speakers",
                "tags",
                "tags",
                "forms",
                "corpora",
                "collections"
            ]
        );
        let mut distinct = creates.clone();
        distinct.dedup();
        let declared: Vec<&str> = ResourceKind::UPLOAD_ORDER
            .iter()
            .map(ResourceKind::name)
            .collect();
        assert_eq!(distinct, declared);

        let migration_tag_id = run.migration_tag_id.unwrap();
        let form_payload = &service.created("forms")[0];
        let form_tags = form_payload["tags"].as_array().unwrap();
        assert!(form_tags.contains(&json!(migration_tag_id)));
        assert!(form_tags.contains(&json!(run.map.tags["verbs"])));
        assert_eq!(form_payload["speaker"], json!(run.map.speakers["Dave Smith"]));
        assert_eq!(form_payload["elicitor"], json!(run.map.users["ana"]));

        let form_id = run.map.forms["d1"];
        let corpus_payload = &service.created("corpora")[0];
        assert_eq!(corpus_payload["content"], json!(form_id.to_string()));
        let collection_payload = &service.created("collections")[0];
        assert_eq!(collection_payload["contents"], json!(format!("form[{}]", form_id)));
        let collection_tags = collection_payload["tags"].as_array().unwrap();
        assert!(collection_tags.contains(&json!(migration_tag_id)));

        assert_eq!(run.report.users_created, vec!["ana".to_owned()]);
        assert_eq!(run.report.forms_created.len(), 1);
        assert!(run.report.forms_deleted.is_empty());
    }

    #[test]
    fn rejected_credentials_abort() {
        let service = MockService { reject_credentials: true, ..MockService::new() };
        let result = Uploader::new(&service, config()).upload(&StagingStore::new());
        assert!(matches!(result, Err(UploadError::AuthenticationFailed(_))));
        assert!(service.call_sequence().is_empty());
    }

    #[test]
    fn failed_migration_tag_creation_aborts() {
        let service = MockService::new().failing_creates_of("tags");
        let result = Uploader::new(&service, config()).upload(&populated_store());
        assert!(matches!(
            result,
            Err(UploadError::CreationFailed { resource: "tags", .. })
        ));
    }

    #[test]
    fn trashed_form_is_created_then_deleted_and_unmapped() {
        let service = MockService::new();
        let mut store = StagingStore::new();
        let mut trashed = form("d1", "s1", "2014-11-10T02:29:00.000Z");
        trashed.deleted = true;
        store.forms = vec![trashed];
        store.collections = vec![Collection {
            title: "t".to_owned(),
            source_session_id: "s1".to_owned(),
            ..Default::default()
        }];
        let run = Uploader::new(&service, config()).upload(&store).unwrap();
        assert_eq!(run.report.forms_created.len(), 1);
        assert_eq!(run.report.forms_deleted.len(), 1);
        assert!(run.map.forms.is_empty());
        assert!(service
            .call_sequence()
            .iter()
            .any(|(op, r)| op == "delete" && r.starts_with("forms/")));
        // the trashed form never reaches the collection contents
        assert_eq!(service.created("collections")[0]["contents"], json!(""));
    }

    #[test]
    fn collection_contents_sorted_by_entry_date() {
        let service = MockService::new();
        let mut store = StagingStore::new();
        store.forms = vec![
            form("d2", "s1", "2014-11-12T00:00:00.000Z"),
            form("d1", "s1", "2014-11-10T00:00:00.000Z"),
            form("d3", "s2", "2014-11-11T00:00:00.000Z"),
        ];
        store.collections = vec![Collection {
            title: "t".to_owned(),
            source_session_id: "s1".to_owned(),
            ..Default::default()
        }];
        let run = Uploader::new(&service, config()).upload(&store).unwrap();
        let expected = format!("form[{}]\nform[{}]", run.map.forms["d1"], run.map.forms["d2"]);
        assert_eq!(service.created("collections")[0]["contents"], json!(expected));
    }

    #[test]
    fn existing_user_is_reused_without_overwrite() {
        let service = MockService::new().with_listing(
            "users",
            vec![json!({"id": 41, "username": "ana", "first_name": "A", "last_name": "S"})],
        );
        let mut store = StagingStore::new();
        store.users = vec![User { username: "ana".to_owned(), ..Default::default() }];
        let run = Uploader::new(&service, config()).upload(&store).unwrap();
        assert_eq!(run.map.users["ana"], 41);
        assert!(run.report.users_created.is_empty());
        assert!(service.created("users").is_empty());
    }

    #[test]
    fn overwrite_never_touches_password_or_regresses_email() {
        let service = MockService::new().with_listing(
            "users",
            vec![json!({
                "id": 41,
                "username": "ana",
                "first_name": "A",
                "last_name": "S",
                "email": "real@example.com"
            })],
        );
        let mut store = StagingStore::new();
        store.users = vec![User {
            username: "ana".to_owned(),
            first_name: "Ana".to_owned(),
            last_name: "Smith".to_owned(),
            email: PLACEHOLDER_EMAIL.to_owned(),
            role: "administrator".to_owned(),
            ..Default::default()
        }];
        let mut cfg = config();
        cfg.overwrite_users = true;
        let run = Uploader::new(&service, cfg).upload(&store).unwrap();
        assert_eq!(run.report.users_updated, vec!["ana".to_owned()]);
        let calls = service.calls.borrow();
        let (_, _, payload) =
            calls.iter().find(|(op, _, _)| op == "update").expect("an update call");
        assert_eq!(payload["email"], json!("real@example.com"));
        assert_eq!(payload["first_name"], json!("Ana"));
        assert_eq!(payload["password"], json!(""));
        assert_eq!(payload["password_confirm"], json!(""));
    }

    #[test]
    fn unchanged_existing_speaker_is_not_updated() {
        let service = MockService::new().with_listing(
            "speakers",
            vec![json!({
                "id": 7,
                "first_name": "Dave",
                "last_name": "Smith",
                "dialect": "Siksika",
                "page_content": ""
            })],
        );
        let mut store = StagingStore::new();
        store.speakers = vec![Speaker {
            first_name: "Dave".to_owned(),
            last_name: "Smith".to_owned(),
            dialect: "Siksika".to_owned(),
            ..Default::default()
        }];
        let mut cfg = config();
        cfg.overwrite_speakers = true;
        let run = Uploader::new(&service, cfg).upload(&store).unwrap();
        assert_eq!(run.map.speakers["Dave Smith"], 7);
        assert!(run.report.speakers_updated.is_empty());
        assert!(!service.call_sequence().iter().any(|(op, _)| op == "update"));
    }

    #[test]
    fn file_payload_is_base64_encoded_and_mapped_per_datum() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("take1.wav");
        fs::write(&local, b"RIFFdata").unwrap();
        let service = MockService::new();
        let mut store = StagingStore::new();
        store.files = vec![
            ls2old_domain::FilePayload {
                filename: "take1.wav".to_owned(),
                mime_type: "audio/x-wav".to_owned(),
                source_datum_id: "d1".to_owned(),
                local_path: Some(local),
                ..Default::default()
            },
            // never downloaded, silently skipped
            ls2old_domain::FilePayload {
                filename: "gone.mp3".to_owned(),
                mime_type: "audio/mpeg".to_owned(),
                source_datum_id: "d1".to_owned(),
                local_path: None,
                ..Default::default()
            },
        ];
        let run = Uploader::new(&service, config()).upload(&store).unwrap();
        let created = service.created("files");
        assert_eq!(created.len(), 1);
        assert_eq!(created[0]["filename"], json!("take1.wav"));
        assert_eq!(created[0]["MIME_type"], json!("audio/x-wav"));
        assert_eq!(
            created[0]["base64_encoded_file"],
            json!(BASE64.encode(b"RIFFdata"))
        );
        assert_eq!(run.map.files["d1"].len(), 1);
        assert_eq!(run.report.files_created.len(), 1);
    }

    #[test]
    fn username_sanitization() {
        assert_eq!(sanitize_username("ana.b!").unwrap(), "anab");
        assert_eq!(sanitize_username("ana_b9").unwrap(), "ana_b9");
        assert!(matches!(
            sanitize_username("!!!"),
            Err(UploadError::InvalidUsername(_))
        ));
    }

    #[test]
    fn sanitized_username_keeps_original_as_relational_key() {
        let service = MockService::new();
        let mut store = StagingStore::new();
        store.users = vec![User { username: "ana.b".to_owned(), ..Default::default() }];
        let run = Uploader::new(&service, config()).upload(&store).unwrap();
        assert!(run.map.users.contains_key("ana.b"));
        assert_eq!(service.created("users")[0]["username"], json!("anab"));
    }

    #[test]
    fn existing_grammaticalities_kept_when_they_cover_staged_ones() {
        let service = MockService::new().with_listing(
            "applicationsettings",
            vec![json!({
                "id": 1,
                "object_language_name": "Old Language",
                "grammaticalities": "*,?,#"
            })],
        );
        let mut store = StagingStore::new();
        store.applicationsettings = vec![ls2old_domain::ApplicationSettings {
            object_language_name: "Blackfoot".to_owned(),
            grammaticalities: "*,?".to_owned(),
        }];
        Uploader::new(&service, config()).upload(&store).unwrap();
        let payload = &service.created("applicationsettings")[0];
        assert_eq!(payload["grammaticalities"], json!("*,?,#"));
        assert_eq!(payload["object_language_name"], json!("Blackfoot"));
    }
}
