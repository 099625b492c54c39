use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hafalan_core::engine::{build_vocabulary_pool, vocabulary_candidates};
use hafalan_core::model::{
    Language, LanguageFilter, Mastery, QuizSettings, Translation, VocabularyConcept,
};

fn make_concepts(n: i64) -> Vec<VocabularyConcept> {
    (0..n)
        .map(|id| VocabularyConcept {
            id,
            owner_id: 1,
            folder_id: None,
            note: String::new(),
            mastery: if id % 5 == 0 {
                Mastery::Mastered
            } else {
                Mastery::Unmastered
            },
            translations: Language::ALL
                .iter()
                .enumerate()
                .map(|(i, &language)| Translation {
                    id: id * 4 + i as i64,
                    concept_id: id,
                    language,
                    term: format!("term-{id}-{i}"),
                    pronunciation: String::new(),
                    gloss: String::new(),
                })
                .collect(),
        })
        .collect()
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("vocabulary_candidates");
    let settings = QuizSettings::default();

    for n in [10, 100, 1000] {
        let concepts = make_concepts(n);
        group.bench_function(format!("concepts={n}"), |b| {
            b.iter(|| vocabulary_candidates(black_box(&concepts), black_box(&settings)))
        });
    }

    group.finish();
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_vocabulary_pool");
    let concepts = make_concepts(1000);

    group.bench_function("any_to_any,max=40", |b| {
        let settings = QuizSettings::default();
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| build_vocabulary_pool(black_box(&concepts), &settings, &mut rng))
    });

    group.bench_function("english_to_any,max=40", |b| {
        let settings = QuizSettings {
            from: LanguageFilter::Only(Language::English),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| build_vocabulary_pool(black_box(&concepts), &settings, &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_candidates, bench_pool);
criterion_main!(benches);
