//! PostgREST (Supabase REST) store implementation.
//!
//! Talks to three tables: `vocabulary` with embedded
//! `vocabulary_translation` rows, and `notes`. Every call is a single
//! attempt; HTTP failures map to [`StoreError`] variants.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use hafalan_core::error::StoreError;
use hafalan_core::model::{
    FreeformNote, ItemRef, Language, Mastery, Translation, TranslationUpsert, VocabularyConcept,
};
use hafalan_core::traits::{MutationSink, SnapshotProvider, Store};

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const VOCABULARY_SELECT: &str =
    "id,user_id,folder_id,catatan,sudah_hafal,vocabulary_translation(id,vocabulary_id,bahasa,kosakata,pengucapan,arti)";

/// REST client for a PostgREST-compatible backend.
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Start a request against `table` with PostgREST filter parameters.
    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        let url = reqwest::Url::parse_with_params(&self.url(table), query)
            .map_err(|e| StoreError::Network(format!("invalid store URL: {e}")))?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation"))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else if e.is_connect() {
                StoreError::Network(format!("store not reachable at {}", self.base_url))
            } else {
                StoreError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status,
                message: body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(format!("failed to parse response: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Wire rows
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct VocabularyRow {
    id: i64,
    user_id: i64,
    #[serde(default)]
    folder_id: Option<i64>,
    #[serde(default)]
    catatan: Option<String>,
    #[serde(default)]
    sudah_hafal: Option<bool>,
    #[serde(default)]
    vocabulary_translation: Vec<TranslationRow>,
}

#[derive(Deserialize)]
struct TranslationRow {
    id: i64,
    vocabulary_id: i64,
    #[serde(default)]
    bahasa: Option<String>,
    #[serde(default)]
    kosakata: Option<String>,
    #[serde(default)]
    pengucapan: Option<String>,
    #[serde(default)]
    arti: Option<String>,
}

#[derive(Serialize)]
struct TranslationBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    vocabulary_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bahasa: Option<&'a str>,
    kosakata: &'a str,
    pengucapan: &'a str,
    arti: &'a str,
}

#[derive(Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Deserialize)]
struct NoteRow {
    id: i64,
    user_id: i64,
    #[serde(default)]
    folder_id: Option<i64>,
    #[serde(default)]
    judul: Option<String>,
    #[serde(default)]
    isi: Option<String>,
    #[serde(default)]
    hafal: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TranslationRow {
    /// Rows tagged with a language outside the closed set are dropped.
    fn into_model(self) -> Option<Translation> {
        let language = self.bahasa.as_deref().and_then(Language::from_store_tag);
        if language.is_none() {
            tracing::debug!(
                id = self.id,
                bahasa = ?self.bahasa,
                "skipping translation with unknown language"
            );
        }
        Some(Translation {
            id: self.id,
            concept_id: self.vocabulary_id,
            language: language?,
            term: self.kosakata.unwrap_or_default(),
            pronunciation: self.pengucapan.unwrap_or_default(),
            gloss: self.arti.unwrap_or_default(),
        })
    }
}

impl From<VocabularyRow> for VocabularyConcept {
    fn from(row: VocabularyRow) -> Self {
        VocabularyConcept {
            id: row.id,
            owner_id: row.user_id,
            folder_id: row.folder_id,
            note: row.catatan.unwrap_or_default(),
            mastery: Mastery::from(row.sudah_hafal.unwrap_or(false)),
            translations: row
                .vocabulary_translation
                .into_iter()
                .filter_map(TranslationRow::into_model)
                .collect(),
        }
    }
}

impl From<NoteRow> for FreeformNote {
    fn from(row: NoteRow) -> Self {
        FreeformNote {
            id: row.id,
            owner_id: row.user_id,
            folder_id: row.folder_id,
            title: row.judul.unwrap_or_default(),
            body: row.isi.unwrap_or_default(),
            mastery: Mastery::from(row.hafal.unwrap_or(false)),
            created_at: row.created_at.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl SnapshotProvider for PostgrestStore {
    #[instrument(skip(self))]
    async fn fetch_vocabulary(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<VocabularyConcept>, StoreError> {
        let mut query = vec![
            ("user_id", format!("eq.{owner_id}")),
            ("select", VOCABULARY_SELECT.to_string()),
            ("order", "id.desc".to_string()),
        ];
        // NULL flags decode as unmastered, so keep them.
        if !include_mastered {
            query.push(("sudah_hafal", "not.is.true".to_string()));
        }

        let rows: Vec<VocabularyRow> = self
            .send(self.request(reqwest::Method::GET, "vocabulary", &query)?)
            .await?;
        Ok(rows.into_iter().map(VocabularyConcept::from).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_notes(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<FreeformNote>, StoreError> {
        let mut query = vec![
            ("user_id", format!("eq.{owner_id}")),
            ("order", "id.desc".to_string()),
        ];
        if !include_mastered {
            query.push(("hafal", "not.is.true".to_string()));
        }

        let rows: Vec<NoteRow> = self
            .send(self.request(reqwest::Method::GET, "notes", &query)?)
            .await?;
        Ok(rows.into_iter().map(FreeformNote::from).collect())
    }
}

#[async_trait]
impl MutationSink for PostgrestStore {
    #[instrument(skip(self), fields(item = %item))]
    async fn write_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError> {
        let (table, body) = match item {
            ItemRef::Concept(_) => (
                "vocabulary",
                serde_json::json!({ "sudah_hafal": bool::from(state) }),
            ),
            ItemRef::Note(_) => ("notes", serde_json::json!({ "hafal": bool::from(state) })),
        };

        let filter = [("id", format!("eq.{}", item.id()))];
        let rows: Vec<IdRow> = self
            .send(self.request(reqwest::Method::PATCH, table, &filter)?.json(&body))
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(item.to_string()));
        }
        Ok(())
    }

    #[instrument(
        skip(self, upsert),
        fields(concept_id = upsert.concept_id, language = %upsert.language)
    )]
    async fn upsert_translation(
        &self,
        upsert: &TranslationUpsert,
    ) -> Result<Translation, StoreError> {
        let tag = upsert.language.store_tag();
        let existing: Vec<IdRow> = self
            .send(
                self.request(
                    reqwest::Method::GET,
                    "vocabulary_translation",
                    &[
                        ("vocabulary_id", format!("eq.{}", upsert.concept_id)),
                        ("bahasa", format!("eq.{tag}")),
                        ("select", "id".to_string()),
                    ],
                )?,
            )
            .await?;

        let rows: Vec<TranslationRow> = match existing.first() {
            Some(row) => {
                let body = TranslationBody {
                    vocabulary_id: None,
                    bahasa: None,
                    kosakata: &upsert.term,
                    pengucapan: &upsert.pronunciation,
                    arti: &upsert.gloss,
                };
                self.send(
                    self.request(
                        reqwest::Method::PATCH,
                        "vocabulary_translation",
                        &[("id", format!("eq.{}", row.id))],
                    )?
                    .json(&body),
                )
                .await?
            }
            None => {
                let body = TranslationBody {
                    vocabulary_id: Some(upsert.concept_id),
                    bahasa: Some(tag),
                    kosakata: &upsert.term,
                    pengucapan: &upsert.pronunciation,
                    arti: &upsert.gloss,
                };
                self.send(
                    self.request(reqwest::Method::POST, "vocabulary_translation", &[])?
                        .json(&body),
                )
                .await?
            }
        };

        rows.into_iter()
            .next()
            .and_then(TranslationRow::into_model)
            .ok_or_else(|| StoreError::Decode("store returned no translation row".into()))
    }
}

impl Store for PostgrestStore {
    fn name(&self) -> &str {
        "postgrest"
    }
}
