use retrieval::{Document, DocumentStore, Retriever, RetrievalError, NO_MATCH};

fn gala() -> Retriever {
    Retriever::new(DocumentStore::from_documents(vec![
        Document::new("Alice", "Alice is a keynote speaker researching renewable energy"),
        Document::new("Bob", "Bob is a sponsor representative from a tech company"),
    ]))
}

fn larger() -> Retriever {
    Retriever::new(DocumentStore::from_documents(vec![
        Document::new("ada", "Ada Lovelace is a mathematician and the first programmer, a close friend of the host"),
        Document::new("grace", "Grace Hopper is a computer scientist and rear admiral who wrote the first compiler"),
        Document::new("alan", "Alan Turing is a mathematician and codebreaker who studied computation"),
        Document::new("marie", "Marie Curie is a physicist and chemist who researched radioactivity"),
        Document::new("empty", ""),
        Document::new("nikola", "Nikola Tesla is an inventor and electrical engineer, a rival of the host"),
    ]))
}

#[test]
fn speaker_query_ranks_alice_first() {
    let r = gala();
    let out = r.retrieve("speaker energy", 3).unwrap();
    assert!(out.starts_with("Alice is a keynote speaker"));
    let hits = r.search("speaker energy", 3).unwrap();
    assert_eq!(hits[0].document.id, "Alice");
}

#[test]
fn gibberish_returns_sentinel() {
    assert_eq!(gala().retrieve("unrelated gibberish zzz", 3).unwrap(), NO_MATCH);
}

#[test]
fn results_are_bounded_positive_and_sorted() {
    let r = larger();
    let queries = ["mathematician", "first host", "the", "computer scientist compiler", "who is a friend", "zzz"];
    for q in queries {
        for k in 1..=7 {
            let hits = r.search(q, k).unwrap();
            assert!(hits.len() <= k, "{q:?} k={k}");
            assert!(hits.iter().all(|h| h.score > 0.0), "{q:?} k={k}");
            assert!(hits.windows(2).all(|w| w[0].score >= w[1].score), "{q:?} k={k}");
            assert!(hits.iter().all(|h| h.document.id != "empty"));
        }
    }
}

#[test]
fn unique_token_ranks_its_document_first() {
    let r = larger();
    for (token, id) in [("lovelace", "ada"), ("hopper", "grace"), ("codebreaker", "alan"), ("radioactivity", "marie"), ("tesla", "nikola")] {
        let hits = r.search(token, 3).unwrap();
        assert_eq!(hits[0].document.id, id, "query {token:?}");
        assert_eq!(hits.len(), 1);
    }
}

#[test]
fn retrieve_is_idempotent() {
    let r = larger();
    let first = r.retrieve("mathematician host", 3).unwrap();
    let second = r.retrieve("mathematician host", 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_corpus_returns_sentinel() {
    let r = Retriever::new(DocumentStore::default());
    assert_eq!(r.retrieve("anyone", 3).unwrap(), NO_MATCH);
}

#[test]
fn rejects_zero_k_and_empty_query() {
    let r = gala();
    assert!(matches!(r.retrieve("speaker", 0), Err(RetrievalError::InvalidArgument(_))));
    assert!(matches!(r.retrieve("", 3), Err(RetrievalError::InvalidArgument(_))));
}

#[test]
fn ties_keep_corpus_order() {
    let r = Retriever::new(DocumentStore::from_documents(vec![
        Document::new("other", "sponsor dinner"),
        Document::new("first", "gala guest"),
        Document::new("second", "guest gala"),
    ]));
    let hits = r.search("gala", 3).unwrap();
    assert_eq!(hits.iter().map(|h| h.document.id.as_str()).collect::<Vec<_>>(), vec!["first", "second"]);
    assert_eq!(hits[0].score, hits[1].score);
    assert_eq!(r.retrieve("guest gala", 3).unwrap(), "gala guest\n\nguest gala");
}

#[test]
fn matching_is_case_insensitive() {
    let r = gala();
    assert_eq!(r.retrieve("SPONSOR", 1).unwrap(), r.retrieve("sponsor", 1).unwrap());
}

#[test]
fn words_with_combining_marks_match_whole() {
    let r = Retriever::new(DocumentStore::from_documents(vec![
        Document::new("hindi", "हिन्दी"),
        Document::new("na", "न"),
    ]));
    let hits = r.search("न", 3).unwrap();
    assert_eq!(hits.iter().map(|h| h.document.id.as_str()).collect::<Vec<_>>(), vec!["na"]);
    let hits = r.search("हिन्दी", 3).unwrap();
    assert_eq!(hits.iter().map(|h| h.document.id.as_str()).collect::<Vec<_>>(), vec!["hindi"]);
}

#[test]
fn dotted_capital_i_matches_plain_query() {
    let r = Retriever::new(DocumentStore::from_documents(vec![
        Document::new("traveller", "Guest flying in from İstanbul"),
        Document::new("local", "Guest living next door"),
    ]));
    assert_eq!(r.retrieve("istanbul", 3).unwrap(), "Guest flying in from İstanbul");
}
