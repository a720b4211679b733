use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub name: String,
    pub sequence_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub chapter_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub topic_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misconception_guide: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContent {
    pub text: String,
    pub options: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub concept_id: String,
    pub content: QuestionContent,
    pub difficulty_level: u8,
    pub correct_option_key: String,
    pub explanation: String,
}

/// One JSON file's worth of curriculum, loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumBundle {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Store {
    pub fn get_chapter(&self, chapter_id: &str) -> Result<Option<Chapter>, StoreError> {
        let key = keys::chapter_key(chapter_id);
        match self.chapters.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_chapters(&self) -> Result<Vec<Chapter>, StoreError> {
        let mut chapters = Vec::new();
        for item in self.chapters.iter() {
            let (_, v) = item?;
            chapters.push(Self::deserialize::<Chapter>(&v)?);
        }
        chapters.sort_by_key(|c| c.sequence_order);
        Ok(chapters)
    }

    pub fn count_chapters(&self) -> Result<u64, StoreError> {
        Ok(self.chapters.len() as u64)
    }

    pub fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>, StoreError> {
        let key = keys::topic_key(topic_id);
        match self.topics.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_concept(&self, concept_id: &str) -> Result<Option<Concept>, StoreError> {
        let key = keys::concept_key(concept_id);
        match self.concepts.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_question(&self, question_id: &str) -> Result<Option<Question>, StoreError> {
        let key = keys::question_key(question_id);
        match self.questions.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Question ids for one concept, via the secondary index.
    pub fn list_question_ids_for_concept(
        &self,
        concept_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        let prefix = keys::question_concept_index_prefix(concept_id);
        let mut ids = Vec::new();
        for item in self.questions_by_concept.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            let text = String::from_utf8(key.to_vec()).map_err(|_| {
                StoreError::Validation("non-utf8 key in questions_by_concept".to_string())
            })?;
            if let Some((_, question_id)) = text.split_once(':') {
                ids.push(question_id.to_string());
            }
        }
        Ok(ids)
    }

    /// Walk concept -> topic -> chapter. Returns None when any link in the
    /// chain is missing (dangling curriculum data).
    pub fn resolve_chapter_for_concept(
        &self,
        concept_id: &str,
    ) -> Result<Option<Chapter>, StoreError> {
        let Some(concept) = self.get_concept(concept_id)? else {
            return Ok(None);
        };
        let Some(topic) = self.get_topic(&concept.topic_id)? else {
            return Ok(None);
        };
        self.get_chapter(&topic.chapter_id)
    }

    pub fn upsert_question(&self, question: &Question) -> Result<(), StoreError> {
        let key = keys::question_key(&question.id);
        let index_key = keys::question_concept_index_key(&question.concept_id, &question.id);
        self.questions
            .insert(key.as_bytes(), Self::serialize(question)?)?;
        self.questions_by_concept
            .insert(index_key.as_bytes(), &[])?;
        Ok(())
    }

    /// Idempotent curriculum import: plain upserts keyed by entity id.
    pub fn import_curriculum(&self, bundle: &CurriculumBundle) -> Result<(), StoreError> {
        for chapter in &bundle.chapters {
            let key = keys::chapter_key(&chapter.id);
            self.chapters
                .insert(key.as_bytes(), Self::serialize(chapter)?)?;
        }
        for topic in &bundle.topics {
            let key = keys::topic_key(&topic.id);
            self.topics.insert(key.as_bytes(), Self::serialize(topic)?)?;
        }
        for concept in &bundle.concepts {
            let key = keys::concept_key(&concept.id);
            self.concepts
                .insert(key.as_bytes(), Self::serialize(concept)?)?;
        }
        for question in &bundle.questions {
            self.upsert_question(question)?;
        }

        tracing::info!(
            chapters = bundle.chapters.len(),
            topics = bundle.topics.len(),
            concepts = bundle.concepts.len(),
            questions = bundle.questions.len(),
            "Curriculum import complete"
        );
        Ok(())
    }
}
