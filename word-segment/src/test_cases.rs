use crate::{Fallback, Search, Segmenter};

/// Run a segmenter against the built-in test cases
pub fn run<F: Fallback>(segmenter: &Segmenter<F>) {
    let mut search = Search::default();
    {
        let words = segmenter.segment("", &mut search);
        assert_eq!(words.len(), 0);
        assert_eq!(words.score(), 0.0);
    }

    let mut success = true;
    for test in TEST_CASES.iter().copied() {
        success &= assert_segments(test, &mut search, segmenter);
    }

    assert!(success);
}

pub fn assert_segments<F: Fallback>(
    s: &[&str],
    search: &mut Search,
    segmenter: &Segmenter<F>,
) -> bool {
    let cmp = segmenter.segment(&s.concat(), search).collect::<Vec<_>>();
    let success = cmp == s;
    if !success {
        println!("expected: {:?}", s);
        println!("actual:   {:?}\n", cmp);
    }
    success
}

/// Built-in test cases
///
/// These are exposed so that you can test with different data sources.
pub const TEST_CASES: &[&[&str]] = &[
    &["研究生", "教育"],
    &["研究", "生命"],
    &["研究", "生命", "起源"],
    &["改变", "研究生", "命运"],
    &["中国", "人民"],
    &["中国", "人民", "大学生"],
    &["大学生", "的", "教育"],
    &["学生", "的", "命运"],
    &["我们", "不能", "改变", "的", "教育"],
    &[
        "研究生", "教育", "研究", "生命", "起源", "不能", "改变", "研究生", "命运",
    ],
    // The bundled counts favour "野生动物" over "动物园"
    &["我们", "在", "野生动物", "园", "玩"],
];
