use pretty_assertions::assert_eq;
use prd_chunker::{
    BlockParser, BlockType, ChunkerConfig, ChunkingStrategy, DocumentProcessor, DocumentType,
    Priority, StrategyMode, TokenCounter,
};
use std::sync::Arc;

/// Exact counter stand-in: one token per whitespace-separated word
struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn encoding(&self) -> &str {
        "words"
    }
}

fn auto_config() -> ChunkerConfig {
    ChunkerConfig {
        max_tokens: 100,
        overlap: 0,
        chunk_threshold: 50,
        combo_threshold: 500,
        ..Default::default()
    }
}

fn exact_processor(config: ChunkerConfig) -> DocumentProcessor {
    DocumentProcessor::with_token_counter(config, Arc::new(WordCounter)).unwrap()
}

fn filler(words: usize) -> String {
    (0..words)
        .map(|i| format!("w{}", i % 7))
        .collect::<Vec<_>>()
        .join(" ")
}

fn requirement_document() -> String {
    format!(
        "# Product\n\n## Goals\n\n**R1. Login** users MUST sign in. {}\n\n\
         ## Scope\n\n| id | text |\n|---|---|\n| R2 | export |\n\n### Notes\n\n{}\n",
        filler(40),
        filler(40)
    )
}

#[test]
fn small_document_is_returned_verbatim() {
    let text = "# Tiny\n\nOnly a few words here.\n";
    let processor = DocumentProcessor::new(ChunkerConfig::default()).unwrap();
    let result = processor.process("tiny.md", text);

    assert_eq!(result.strategy, ChunkingStrategy::None);
    assert_eq!(result.chunk_count, 1);
    assert_eq!(result.chunks[0].text, text);
    assert_eq!(result.chunks[0].prev_id, None);
    assert_eq!(result.chunks[0].next_id, None);
}

#[test]
fn auto_selects_hierarchical_for_requirement_documents() {
    let result = exact_processor(auto_config()).process("prd.md", &requirement_document());

    assert_eq!(result.strategy, ChunkingStrategy::Hierarchical);
    assert!(result.structured_mode);
    assert_eq!(result.encoding, "words");

    let paths: Vec<&str> = result
        .chunks
        .iter()
        .map(|c| c.parent_summary.as_str())
        .collect();
    assert_eq!(paths, vec!["Product/Goals", "Product/Scope", "Product/Scope/Notes"]);
    assert_eq!(result.chunks[0].metadata.requirement_ids, vec!["R1"]);
    assert_eq!(result.chunks[0].metadata.priority, Priority::High);
    assert!(result.chunks[1].has_table);
}

#[test]
fn auto_selects_combined_for_very_large_documents() {
    let mut text = requirement_document();
    text.push_str(&format!("\n## Appendix\n\n{}\n", filler(600)));
    let result = exact_processor(auto_config()).process("prd.md", &text);

    assert_eq!(result.strategy, ChunkingStrategy::HierarchicalSemantic);
    assert!(result.chunks.iter().all(|c| c.token_count <= 100 || c.is_atomic));
    assert!(result
        .chunks
        .iter()
        .filter(|c| c.parent_summary == "Product/Appendix")
        .count()
        > 1);
}

#[test]
fn auto_selects_semantic_for_table_heavy_documents() {
    let mut text = String::from("Inventory of supported exports.\n\n| format | note |\n|---|---|\n");
    for i in 0..20 {
        text.push_str(&format!("| f{i} | n{i} |\n"));
    }
    text.push_str("\nClosing remarks about the inventory.\n");
    let result = exact_processor(auto_config()).process("table.md", &text);

    assert_eq!(result.strategy, ChunkingStrategy::Semantic);
    assert_eq!(result.chunk_count, 3);
    assert!(result.chunks[1].is_atomic);
    assert!(!result.structured_mode);
}

#[test]
fn auto_selects_fixed_for_plain_text() {
    let text = (0..6)
        .map(|_| filler(40))
        .collect::<Vec<_>>()
        .join("\n\n");
    let result = exact_processor(auto_config()).process("plain.txt", &text);

    assert_eq!(result.strategy, ChunkingStrategy::Fixed);
    assert!(result.chunk_count >= 3);
    assert!(result.chunks.iter().all(|c| c.section_path.is_empty()));
}

#[test]
fn approximate_estimator_uses_narrower_threshold() {
    // 150 chars -> 50 approximate tokens: above 2/3 of 60, below 60
    let text = "x".repeat(150);
    let config = ChunkerConfig {
        chunk_threshold: 60,
        combo_threshold: 1_000,
        ..Default::default()
    };
    let result = DocumentProcessor::new(config).unwrap().process("doc.md", &text);
    assert_eq!(result.total_tokens, 50);
    assert_eq!(result.strategy, ChunkingStrategy::Fixed);
    assert_eq!(result.encoding, "cl100k_base");
}

#[test]
fn table_stays_whole_under_tight_budget() {
    let text = "Intro paragraph with several words in it.\n\n\
                | name | role |\n|---|---|\n| kim | dev |\n| lee | pm |\n| park | qa |\n\n\
                Trailing paragraph.";
    let config = ChunkerConfig {
        max_tokens: 5,
        overlap: 0,
        ..ChunkerConfig::with_strategy(ChunkingStrategy::Fixed)
    };
    let result = DocumentProcessor::new(config).unwrap().process("t.md", text);

    let tables: Vec<_> = result.chunks.iter().filter(|c| c.has_table).collect();
    assert_eq!(tables.len(), 1);
    assert!(tables[0].is_atomic);
    assert!(tables[0].text.contains("|---|---|"));
    assert!(tables[0].text.contains("| park | qa |"));
    assert_eq!(result.oversized_chunks().count(), 1);
}

#[test]
fn code_block_keeps_both_fences() {
    let text = "# Build\n\n```bash\ncargo build --release\n\necho done\n```\n\nAfter the build.";
    let config = ChunkerConfig {
        max_tokens: 4,
        ..ChunkerConfig::with_strategy(ChunkingStrategy::Semantic)
    };
    let result = DocumentProcessor::new(config).unwrap().process("c.md", text);

    let code: Vec<_> = result.chunks.iter().filter(|c| c.has_code).collect();
    assert_eq!(code.len(), 1);
    let fences = code[0]
        .text
        .lines()
        .filter(|l| l.trim_start().starts_with("```"))
        .count();
    assert_eq!(fences, 2);
}

#[test]
fn hierarchical_paths_with_korean_headings() {
    let text = "# H1제목\n\nH1 내용입니다.\n\n## H2제목\n\nH2 내용입니다.\n";
    let result = DocumentProcessor::new(ChunkerConfig::with_strategy(ChunkingStrategy::Hierarchical))
        .unwrap()
        .process("hier.md", text);

    assert_eq!(result.chunk_count, 2);
    let h2 = &result.chunks[1];
    assert_eq!(h2.nesting_level, 2);
    assert_eq!(h2.section_path, vec!["H1제목".to_string(), "H2제목".to_string()]);
    assert_eq!(h2.parent_summary, "H1제목/H2제목");
    assert_eq!(result.section_tree.len(), 2);
    assert_eq!(result.section_tree[1].level, 2);
}

#[test]
fn requirement_line_metadata() {
    let text = "**R1. Login** — system MUST support SSO.";
    let result = DocumentProcessor::new(ChunkerConfig::default())
        .unwrap()
        .process("r.md", text);

    let meta = &result.chunks[0].metadata;
    assert_eq!(meta.requirement_ids, vec!["R1"]);
    assert_eq!(meta.priority, Priority::High);
}

#[test]
fn korean_document_types_per_section() {
    let text = "# 요구사항\n\n## 기능 요구사항\n\n로그인 기능\n\n## 비기능 요구사항\n\n응답 시간 200ms\n\n\
                ## 제약 조건\n\nWindows 10\n\n## 용어 정의\n\nAPI 인터페이스\n";
    let result = DocumentProcessor::new(ChunkerConfig::with_strategy(ChunkingStrategy::Hierarchical))
        .unwrap()
        .process("ko.md", text);

    let types: Vec<DocumentType> = result
        .chunks
        .iter()
        .map(|c| c.metadata.document_type)
        .collect();
    assert_eq!(
        types,
        vec![
            DocumentType::Functional,
            DocumentType::NonFunctional,
            DocumentType::Constraint,
            DocumentType::Glossary,
        ]
    );
}

#[test]
fn three_row_table_parses_as_one_block() {
    let text = "| h | v |\n|---|---|\n| 1 | a |\n| 2 | b |\n| 3 | c |";
    let blocks = BlockParser::new().parse(text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockType::Table);
    assert_eq!(blocks[0].text, text);
}

#[test]
fn large_document_hierarchical() {
    let mut text = String::new();
    for i in 0..30 {
        text.push_str(&format!("# 섹션 {i}\n\n"));
        for j in 0..10 {
            text.push_str(&format!("## 하위 섹션 {i}-{j}\n\n"));
            let words: Vec<String> = (0..100).map(|k| format!("단어{k}")).collect();
            text.push_str(&words.join(" "));
            text.push_str("\n\n");
        }
    }
    let result = DocumentProcessor::new(ChunkerConfig::with_strategy(ChunkingStrategy::Hierarchical))
        .unwrap()
        .process("large.md", &text);

    assert_eq!(result.chunk_count, 300);
    assert_eq!(result.section_tree.len(), 330);
    assert_eq!(result.chunks[0].parent_summary, "섹션 0/하위 섹션 0-0");
    assert_eq!(result.chunks[299].parent_summary, "섹션 29/하위 섹션 29-9");
}

#[test]
fn result_serializes_with_chunk_records() {
    let config = ChunkerConfig {
        strategy: StrategyMode::Forced(ChunkingStrategy::HierarchicalSemantic),
        ..Default::default()
    };
    let result = DocumentProcessor::new(config)
        .unwrap()
        .process("s.md", &requirement_document());
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["strategy"], "hierarchical+semantic");
    assert_eq!(value["source_identifier"], "s.md");
    for chunk in value["chunks"].as_array().unwrap() {
        assert!(chunk.get("chunk_id").is_some());
        assert!(chunk.get("text").is_some());
        assert!(chunk.get("token_count").is_some());
        assert!(chunk.get("requirement_ids").is_some());
    }
}

#[test]
fn processor_is_shareable_across_threads() {
    let processor = Arc::new(exact_processor(auto_config()));
    let text = Arc::new(requirement_document());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let processor = Arc::clone(&processor);
            let text = Arc::clone(&text);
            std::thread::spawn(move || processor.process("prd.md", &text))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
