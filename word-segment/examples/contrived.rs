use word_segment::{FrequencyModel, LengthPenalty, Search, Segmenter};

fn main() {
    let counts = vec![
        ("研究", 100),
        ("生教育", 5),
        ("生", 50),
        ("研究生", 80),
    ];

    let model = FrequencyModel::new(counts, Some(1000.0), LengthPenalty).unwrap();
    let segmenter = Segmenter::new(model);
    let mut search = Search::default();

    let words = segmenter.segment("研究生教育", &mut search);
    println!("{:.3e}", words.probability());
    println!("{:?}", words.collect::<Vec<&str>>());
}
