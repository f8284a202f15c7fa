use strum_macros::Display;

use super::token::Token;

/// Elements whose contents are read as raw text up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine, reduced to the four states this renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    ///
    /// Text accumulates until the next `<`.
    Data,
    /// Inside `<...>`. Everything up to the next `>` is tag text.
    Tag,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// Inside `<!-- ... -->`. A bare `>` does not end the comment.
    Comment,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Inside `script` or `style`, up to the matching end tag.
    RawText,
}

/// Splits markup into [`Token`]s.
///
/// The tokenizer never fails. Malformed markup degrades into text or is dropped:
/// a `>` outside a tag is text, an empty `<>` is discarded, and a tag that is
/// still open at end of input is dropped.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    /// Pending text, flushed as a [`Token::Text`] at the next tag boundary.
    pub(super) text_buffer: String,
    /// Text between `<` and `>` of the tag being read.
    pub(super) tag_buffer: String,
    /// Body of the comment being read.
    pub(super) comment_buffer: String,
    /// Name of the element whose raw text we are inside, if any.
    pub(super) raw_text_element: Option<String>,
    pub(super) token_stream: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
    /// "The initial state is the data state."
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            text_buffer: String::new(),
            tag_buffer: String::new(),
            comment_buffer: String::new(),
            raw_text_element: None,
            token_stream: Vec::new(),
        }
    }

    /// Consume the tokenizer and return the emitted tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the state machine over the whole input.
    ///
    /// The last token emitted is always [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while let Some(c) = self.consume() {
            match self.state {
                TokenizerState::Data => self.handle_data_state(c),
                TokenizerState::Tag => self.handle_tag_state(c),
                TokenizerState::Comment => self.handle_comment_state(c),
                TokenizerState::RawText => self.handle_raw_text_state(c),
            }
        }
        self.handle_eof();
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: char) {
        match c {
            '<' => {
                self.flush_text();
                if self.next_few_characters_are("!--") {
                    self.skip(3);
                    self.comment_buffer.clear();
                    self.switch_to(TokenizerState::Comment);
                } else {
                    self.tag_buffer.clear();
                    self.switch_to(TokenizerState::Tag);
                }
            }
            _ => self.text_buffer.push(c),
        }
    }

    /// Accumulate tag text until `>`.
    fn handle_tag_state(&mut self, c: char) {
        match c {
            '>' => {
                let text = std::mem::take(&mut self.tag_buffer);
                self.emit_tag(&text);
            }
            _ => self.tag_buffer.push(c),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self, c: char) {
        if c == '-' && self.next_few_characters_are("->") {
            self.skip(2);
            let data = std::mem::take(&mut self.comment_buffer);
            self.emit_token(Token::Comment { data });
            self.switch_to(TokenizerState::Data);
        } else {
            self.comment_buffer.push(c);
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Only `</name` for the element we are inside ends raw text; any other `<`
    /// is content.
    fn handle_raw_text_state(&mut self, c: char) {
        if c == '<' && self.is_appropriate_end_tag() {
            self.flush_text();
            self.raw_text_element = None;
            self.tag_buffer.clear();
            self.switch_to(TokenizerState::Tag);
        } else {
            self.text_buffer.push(c);
        }
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// Pending text is flushed; an unterminated tag is dropped. An unterminated
    /// comment is still emitted so it is discarded like any other comment.
    fn handle_eof(&mut self) {
        match self.state {
            TokenizerState::Data | TokenizerState::RawText => self.flush_text(),
            TokenizerState::Tag => self.tag_buffer.clear(),
            TokenizerState::Comment => {
                let data = std::mem::take(&mut self.comment_buffer);
                self.emit_token(Token::Comment { data });
            }
        }
        self.emit_token(Token::EndOfFile);
    }

    /// Turn finished tag text into a token.
    fn emit_tag(&mut self, text: &str) {
        self.switch_to(TokenizerState::Data);
        let Some(token) = Self::tag_token(text) else {
            return;
        };
        let raw_text_element = match &token {
            Token::StartTag { name, .. } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                Some(name.clone())
            }
            _ => None,
        };
        if raw_text_element.is_some() {
            self.raw_text_element = raw_text_element;
            self.switch_to(TokenizerState::RawText);
        }
        self.emit_token(token);
    }
}
