use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use study_core::model::{
    Chapter, ChapterId, GrammarRecord, Question, QuestionId, QuizKey, StudyRecord,
    VocabularyRecord,
};

use super::wire::{Listing, WireChapter, WireGrammar, WireNote, WireQuestion, WireVocabulary};
use super::{AnswerVerdict, ImportRequest, ImportSummary, SearchKind, StudyApi};
use crate::config::StudyApiConfig;
use crate::error::ApiError;

/// `StudyApi` over HTTP.
#[derive(Clone, Debug)]
pub struct HttpStudyApi {
    client: Client,
    base_url: Url,
}

impl HttpStudyApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &StudyApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn get_list<W, T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, ApiError>
    where
        W: DeserializeOwned,
        T: From<W>,
    {
        let url = self.endpoint(path, query)?;
        debug!(%url, "GET");
        let response = checked(self.client.get(url).send().await?)?;
        let listing: Listing<W> = response.json().await?;
        Ok(listing.into_vec().into_iter().map(T::from).collect())
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path, &[])?;
        debug!(%url, "POST");
        let response = checked(self.client.post(url).json(body).send().await?)?;
        Ok(response.json().await?)
    }

    async fn questions(&self, path: &str, key: &QuizKey) -> Result<Vec<Question>, ApiError> {
        self.get_list::<WireQuestion, Question>(path, &key_query(key))
            .await
    }
}

fn checked(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::HttpStatus(response.status()))
    }
}

fn key_query(key: &QuizKey) -> Vec<(&'static str, String)> {
    vec![
        ("book_name", key.book_name.clone()),
        ("chapter_number", key.chapter_number.to_string()),
        ("question_type", key.question_type.as_str().to_string()),
    ]
}

#[derive(Serialize)]
struct AnswerBody<'a> {
    answer: &'a str,
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn list_chapters(&self, book_name: Option<&str>) -> Result<Vec<Chapter>, ApiError> {
        let query: Vec<(&str, String)> = book_name
            .map(|book| ("book_name", book.to_string()))
            .into_iter()
            .collect();
        self.get_list::<WireChapter, Chapter>("chapters/", &query)
            .await
    }

    async fn find_chapter(
        &self,
        book_name: &str,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, ApiError> {
        let query = [
            ("book_name", book_name.to_string()),
            ("chapter_number", chapter_number.to_string()),
        ];
        let chapters = self
            .get_list::<WireChapter, Chapter>("chapters/", &query)
            .await?;
        Ok(chapters
            .into_iter()
            .find(|c| c.book_name == book_name && c.chapter_number == chapter_number))
    }

    async fn input_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError> {
        self.questions("input-test-questions/", key).await
    }

    async fn jlpt_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError> {
        self.questions("jlpt-test-questions/", key).await
    }

    async fn vocabularies(&self, chapter: ChapterId) -> Result<Vec<VocabularyRecord>, ApiError> {
        let query = [("chapter", chapter.value().to_string())];
        self.get_list::<WireVocabulary, VocabularyRecord>("vocabularies/", &query)
            .await
    }

    async fn grammar_patterns(&self, chapter: ChapterId) -> Result<Vec<GrammarRecord>, ApiError> {
        let query = [("chapter", chapter.value().to_string())];
        self.get_list::<WireGrammar, GrammarRecord>("grammar_patterns/", &query)
            .await
    }

    async fn search(&self, kind: SearchKind, query: &str) -> Result<Vec<StudyRecord>, ApiError> {
        let params = [("search", query.to_string())];
        match kind {
            SearchKind::Vocabulary => {
                self.get_list::<WireVocabulary, StudyRecord>(kind.path(), &params)
                    .await
            }
            SearchKind::Grammar => {
                self.get_list::<WireGrammar, StudyRecord>(kind.path(), &params)
                    .await
            }
            SearchKind::Notes => {
                self.get_list::<WireNote, StudyRecord>(kind.path(), &params)
                    .await
            }
        }
    }

    async fn submit_answer(
        &self,
        question: QuestionId,
        answer: &str,
    ) -> Result<AnswerVerdict, ApiError> {
        let path = format!("input-test-questions/{}/submit_answer/", question.value());
        self.post(&path, &AnswerBody { answer }).await
    }

    async fn import_questions(&self, request: &ImportRequest) -> Result<ImportSummary, ApiError> {
        self.post("input-test-questions/import_questions/", request)
            .await
    }
}
