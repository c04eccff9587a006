use std::str::CharIndices;

use tantivy::tokenizer::{LowerCaser, TextAnalyzer, Token, TokenStream, Tokenizer};

/// Tokens shorter than this many characters are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Letters, digits and `_`.
fn is_word_char(c: char) -> bool { c.is_alphanumeric() || c == '_' }

/// Emits maximal runs of word characters; `_` joins words instead of
/// splitting them (`sol_acide` is one token).
#[derive(Clone, Default)]
pub struct WordCharTokenizer {
	token: Token,
}

pub struct WordCharTokenStream<'a> {
	text: &'a str,
	chars: CharIndices<'a>,
	token: &'a mut Token,
}

impl Tokenizer for WordCharTokenizer {
	type TokenStream<'a> = WordCharTokenStream<'a>;

	fn token_stream<'a>(&'a mut self, text: &'a str) -> WordCharTokenStream<'a> {
		self.token = Token::default();
		WordCharTokenStream { text, chars: text.char_indices(), token: &mut self.token }
	}
}

impl WordCharTokenStream<'_> {
	fn word_end(&mut self) -> usize {
		(&mut self.chars)
			.find(|&(_, c)| !is_word_char(c))
			.map_or(self.text.len(), |(offset, _)| offset)
	}
}

impl TokenStream for WordCharTokenStream<'_> {
	fn advance(&mut self) -> bool {
		self.token.text.clear();
		self.token.position = self.token.position.wrapping_add(1);
		while let Some((start, c)) = self.chars.next() {
			if is_word_char(c) {
				let end = self.word_end();
				self.token.offset_from = start;
				self.token.offset_to = end;
				self.token.text.push_str(&self.text[start..end]);
				return true;
			}
		}
		false
	}

	fn token(&self) -> &Token { self.token }

	fn token_mut(&mut self) -> &mut Token { self.token }
}

pub fn build_analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(WordCharTokenizer::default())
		.filter(LowerCaser)
		.build()
}

/// Lowercased runs of word characters, at least two characters long.
/// No stop words are removed: short function words still count as terms.
#[derive(Clone)]
pub struct WordTokenizer {
	analyzer: TextAnalyzer,
}

impl Default for WordTokenizer {
	fn default() -> Self { Self { analyzer: build_analyzer() } }
}

impl WordTokenizer {
	pub fn new() -> Self { Self::default() }

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		// token_stream needs &mut; a clone keeps tokenize usable from shared refs
		let mut analyzer = self.analyzer.clone();
		let mut stream = analyzer.token_stream(text);
		let mut tokens = Vec::new();
		while stream.advance() {
			let tok = stream.token();
			if tok.text.chars().count() >= MIN_TOKEN_CHARS { tokens.push(tok.text.clone()); }
		}
		tokens
	}
}
