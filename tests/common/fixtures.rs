use adaptive_backend::store::operations::curriculum::{
    Chapter, Concept, CurriculumBundle, Question, QuestionContent, Topic,
};
use adaptive_backend::store::Store;

/// One chapter -> one topic -> one concept -> `question_count` questions,
/// all with correct answer "A".
pub fn seed_curriculum(store: &Store, question_count: usize) -> CurriculumBundle {
    let bundle = CurriculumBundle {
        chapters: vec![Chapter {
            id: "ch-algebra".to_string(),
            name: "Algebra Basics".to_string(),
            sequence_order: 1,
            unit_tag: Some("math".to_string()),
        }],
        topics: vec![Topic {
            id: "t-linear".to_string(),
            chapter_id: "ch-algebra".to_string(),
            name: "Linear equations".to_string(),
            description: None,
        }],
        concepts: vec![Concept {
            id: "c-solve-x".to_string(),
            topic_id: "t-linear".to_string(),
            name: "Solving for x".to_string(),
            misconception_guide: None,
        }],
        questions: (0..question_count)
            .map(|idx| Question {
                id: format!("q-{idx}"),
                concept_id: "c-solve-x".to_string(),
                content: QuestionContent {
                    text: format!("Solve: x + {idx} = {}", idx + 2),
                    options: [
                        ("A".to_string(), "2".to_string()),
                        ("B".to_string(), "1".to_string()),
                        ("C".to_string(), "0".to_string()),
                        ("D".to_string(), "-2".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                    hint: Some("Move the constant across".to_string()),
                },
                difficulty_level: 1 + (idx % 3) as u8,
                correct_option_key: "A".to_string(),
                explanation: "Subtract the constant from both sides.".to_string(),
            })
            .collect(),
    };

    store.import_curriculum(&bundle).expect("seed curriculum");
    bundle
}

#[allow(dead_code)]
pub fn submit_body(student_id: &str, question_id: &str, option: &str) -> serde_json::Value {
    serde_json::json!({
        "studentId": student_id,
        "questionId": question_id,
        "selectedOption": option,
        "timeTakenSeconds": 15,
    })
}
