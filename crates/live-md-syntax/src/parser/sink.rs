//! Replays parser events into a rowan green tree.
//!
//! The sink walks the token slice in step with the events: every `Leaf`
//! takes the next `glued` tokens and joins their text, so the tree's text is
//! always the lexer's input unchanged.

use rowan::GreenNodeBuilder;

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    next: usize,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            next: 0,
        }
    }

    /// Build the tree for `events`, consuming the sink.
    pub fn finish(mut self, events: Vec<Event>) -> SyntaxNode {
        for event in events {
            match event {
                Event::Reserved => {}
                Event::Open(kind) => self.builder.start_node(kind.into()),
                Event::Leaf { kind, glued } => self.leaf(kind, glued as usize),
                Event::Close => self.builder.finish_node(),
            }
        }
        SyntaxNode::new_root(self.builder.finish())
    }

    fn leaf(&mut self, kind: SyntaxKind, glued: usize) {
        let end = (self.next + glued).min(self.tokens.len());
        let raw = &self.tokens[self.next..end];
        self.next = end;

        match raw {
            [single] => self.builder.token(kind.into(), single.text),
            _ => {
                let text: String = raw.iter().map(|t| t.text).collect();
                self.builder.token(kind.into(), &text);
            }
        }
    }
}
