//! Line scanner turning document text into typed blocks.
//!
//! The dialect is a constrained Markdown: fenced code, pipe tables, ATX
//! headings (depth 1-4), bullet/ordinal lists and paragraphs. The scanner
//! looks at most three lines ahead and never drops input: every non-blank
//! line ends up in exactly one block.

use crate::patterns;
use crate::types::{Block, BlockType};

/// How far past a `|` line the header separator may appear
const TABLE_SEPARATOR_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    start: usize,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    text.split('\n')
        .map(|line| {
            let out = Line { text: line, start };
            start += line.len() + 1;
            out
        })
        .collect()
}

/// Parser for PRD-style Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockParser;

impl BlockParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse text into blocks with offsets relative to `text`
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Block> {
        let lines = split_lines(text);
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            if line.is_blank() {
                i += 1;
                continue;
            }

            if let Some(marker) = patterns::fence_marker(line.text) {
                let end = Self::fence_end(&lines, i, marker);
                blocks.push(Self::block(text, &lines, i, end, BlockType::CodeBlock, 0));
                i = end + 1;
                continue;
            }

            if Self::is_table_start(&lines, i) {
                let mut end = i;
                while end + 1 < lines.len() && patterns::is_table_line(lines[end + 1].text) {
                    end += 1;
                }
                blocks.push(Self::block(text, &lines, i, end, BlockType::Table, 0));
                i = end + 1;
                continue;
            }

            if let Some((level, _)) = patterns::heading(line.text) {
                blocks.push(Self::block(text, &lines, i, i, BlockType::Heading, level));
                i += 1;
                continue;
            }

            if patterns::is_list_item(line.text) {
                let mut end = i;
                while end + 1 < lines.len() && Self::continues_list(lines[end + 1]) {
                    end += 1;
                }
                blocks.push(Self::block(text, &lines, i, end, BlockType::List, 0));
                i = end + 1;
                continue;
            }

            let mut end = i;
            while end + 1 < lines.len()
                && !lines[end + 1].is_blank()
                && !Self::starts_block(&lines, end + 1)
            {
                end += 1;
            }
            blocks.push(Self::block(text, &lines, i, end, BlockType::Paragraph, 0));
            i = end + 1;
        }

        blocks
    }

    /// Index of the closing fence, or the last line when unterminated
    fn fence_end(lines: &[Line<'_>], open: usize, marker: &str) -> usize {
        lines[open + 1..]
            .iter()
            .position(|line| line.text.trim_start().starts_with(marker))
            .map_or(lines.len() - 1, |offset| open + 1 + offset)
    }

    fn is_table_start(lines: &[Line<'_>], i: usize) -> bool {
        if !patterns::is_table_line(lines[i].text) {
            return false;
        }
        let window_end = (i + 1 + TABLE_SEPARATOR_LOOKAHEAD).min(lines.len());
        lines[i..window_end]
            .iter()
            .any(|line| patterns::is_table_separator(line.text))
    }

    fn continues_list(line: Line<'_>) -> bool {
        if line.is_blank() {
            return false;
        }
        patterns::is_list_item(line.text) || line.text.starts_with([' ', '\t'])
    }

    /// Whether line `i` opens a structural block that ends a paragraph
    fn starts_block(lines: &[Line<'_>], i: usize) -> bool {
        let line = lines[i].text;
        patterns::fence_marker(line).is_some()
            || Self::is_table_start(lines, i)
            || patterns::heading(line).is_some()
            || patterns::is_list_item(line)
    }

    fn block(
        text: &str,
        lines: &[Line<'_>],
        first: usize,
        last: usize,
        kind: BlockType,
        heading_level: u8,
    ) -> Block {
        let start = lines[first].start;
        let end = lines[last].end();
        Block::new(kind, &text[start..end], start, heading_level)
    }
}
