//! Blocking token channel between the lexer and parser threads
//!
//! The channel is an unbounded FIFO guarded by a mutex, with a condition
//! variable waking the consumer. Reading is split in two: [`TokenChannel::consume`]
//! peeks at the front token (blocking until one exists) and
//! [`TokenChannel::pop`] removes it, so the parser can look at a token's kind
//! before deciding to match it.
//!
//! The producer closes the channel when it stops. A consumer blocked on an
//! empty, closed channel is woken and receives `None` instead of waiting
//! forever.

use crate::lexer::token::Token;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ChannelState {
    tokens: VecDeque<Token>,
    closed: bool,
}

/// Single-producer, single-consumer token queue.
#[derive(Debug, Default)]
pub struct TokenChannel {
    state: Mutex<ChannelState>,
    available: Condvar,
}

impl TokenChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        // A panicking peer cannot leave the queue half-updated, so the data
        // behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `token` and wakes a waiting consumer. Never blocks.
    ///
    /// Tokens produced after [`close`](Self::close) are dropped.
    pub fn produce(&self, token: Token) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.tokens.push_back(token);
        }
        self.available.notify_one();
    }

    /// Blocks until a token is available and returns a copy of the front
    /// token without removing it.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub fn consume(&self) -> Option<Token> {
        let state = self.lock();
        let state = self
            .available
            .wait_while(state, |s| s.tokens.is_empty() && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        state.tokens.front().cloned()
    }

    /// Removes and returns the front token, if any. Does not block.
    pub fn pop(&self) -> Option<Token> {
        self.lock().tokens.pop_front()
    }

    /// Marks the end of production and wakes every waiting consumer.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of tokens produced but not yet popped.
    pub fn len(&self) -> usize {
        self.lock().tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pops every remaining token, blocking until the channel is closed.
    pub fn drain(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.consume().is_some() {
            if let Some(token) = self.pop() {
                tokens.push(token);
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::TerminalKind;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn int(lexeme: &str) -> Token {
        Token::new(lexeme, TerminalKind::IntLiteral)
    }

    #[test]
    fn test_consume_peeks_without_removing() {
        let channel = TokenChannel::new();
        channel.produce(int("1"));
        channel.produce(int("2"));

        assert_eq!(channel.consume().map(|t| t.lexeme), Some("1".to_string()));
        assert_eq!(channel.consume().map(|t| t.lexeme), Some("1".to_string()));
        assert_eq!(channel.len(), 2);

        assert_eq!(channel.pop().map(|t| t.lexeme), Some("1".to_string()));
        assert_eq!(channel.consume().map(|t| t.lexeme), Some("2".to_string()));
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let channel = TokenChannel::new();
        assert!(channel.pop().is_none());
        assert!(channel.is_empty());
    }

    #[test]
    fn test_closed_channel_wakes_consumer() {
        let channel = Arc::new(TokenChannel::new());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.consume())
        };

        thread::sleep(Duration::from_millis(20));
        channel.close();

        assert!(consumer.join().unwrap().is_none());
    }

    #[test]
    fn test_closed_channel_still_delivers_buffered_tokens() {
        let channel = TokenChannel::new();
        channel.produce(int("7"));
        channel.close();
        channel.produce(int("8"));

        assert_eq!(channel.drain().len(), 1);
        assert!(channel.consume().is_none());
    }

    #[test]
    fn test_fifo_across_threads() {
        let channel = Arc::new(TokenChannel::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for i in 0..1000 {
                    channel.produce(int(&i.to_string()));
                }
                channel.close();
            })
        };

        let received: Vec<String> = channel.drain().into_iter().map(|t| t.lexeme).collect();
        producer.join().unwrap();

        let expected: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
        assert_eq!(received, expected);
    }
}
