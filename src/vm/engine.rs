//! Post-order stack machine
//!
//! The AST is walked in post-order, so an operator runs only after both of its
//! operand subtrees have left their values on the operand stack. Literals are
//! pushed as tokens; an operator pops the right operand, then the left one,
//! and pushes `left OP right` as a fresh literal token.
//!
//! If either operand is a float the operation is done in `f64` and yields a
//! float literal, otherwise it is checked `i64` arithmetic.

use super::errors::VmError;
use crate::lexer::token::{TerminalKind, Token};
use crate::parser::tree::SyntaxTree;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn parse(token: &Token) -> Result<Self, VmError> {
        let invalid = || VmError::InvalidLiteral {
            token: token.clone(),
        };
        match token.kind {
            TerminalKind::IntLiteral => token.lexeme.parse().map(Number::Int).map_err(|_| invalid()),
            TerminalKind::FloatLiteral => token
                .lexeme
                .parse()
                .map(Number::Float)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }

    fn into_token(self) -> Token {
        match self {
            Number::Int(n) => Token::new(n.to_string(), TerminalKind::IntLiteral),
            // Debug keeps the decimal point: 4.0, not 4
            Number::Float(x) => Token::new(format!("{:?}", x), TerminalKind::FloatLiteral),
        }
    }
}

pub struct StackVm<'a> {
    ast: &'a SyntaxTree,
    operands: Vec<Token>,
}

impl<'a> StackVm<'a> {
    pub fn new(ast: &'a SyntaxTree) -> Self {
        StackVm {
            ast,
            operands: Vec::new(),
        }
    }

    /// Evaluate the whole tree to a single literal token.
    pub fn run(&mut self) -> Result<Token, VmError> {
        self.operands.clear();
        for id in self.ast.postorder() {
            let token = self.ast.token(id);
            self.execute(token)?;
        }

        match self.operands.len() {
            0 => Err(VmError::EmptyProgram),
            1 => self.operands.pop().ok_or(VmError::EmptyProgram),
            remaining => Err(VmError::UnbalancedStack { remaining }),
        }
    }

    /// Values currently on the operand stack, bottom first.
    pub fn operands(&self) -> &[Token] {
        &self.operands
    }

    fn execute(&mut self, token: &Token) -> Result<(), VmError> {
        match token.kind {
            TerminalKind::IntLiteral | TerminalKind::FloatLiteral => {
                Number::parse(token)?;
                self.operands.push(token.clone());
                Ok(())
            }
            TerminalKind::OpeningBracket | TerminalKind::ClosingBracket => Ok(()),
            kind if kind.is_arithmetic_op() => self.binary(token),
            _ => Err(VmError::UnsupportedToken {
                token: token.clone(),
            }),
        }
    }

    fn binary(&mut self, operator: &Token) -> Result<(), VmError> {
        let available = self.operands.len();
        let (Some(right), Some(left)) = (self.operands.pop(), self.operands.pop()) else {
            return Err(VmError::Arity {
                operator: operator.clone(),
                available,
            });
        };

        let result = apply(operator, Number::parse(&left)?, Number::parse(&right)?)?;
        self.operands.push(result.into_token());
        Ok(())
    }
}

fn apply(operator: &Token, left: Number, right: Number) -> Result<Number, VmError> {
    let kind = operator.kind;
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => {
            let result = match kind {
                TerminalKind::ArithmeticOpPlus => a.checked_add(b),
                TerminalKind::ArithmeticOpMinus => a.checked_sub(b),
                TerminalKind::ArithmeticOpMult => a.checked_mul(b),
                TerminalKind::ArithmeticOpDiv => {
                    if b == 0 {
                        return Err(VmError::DivisionByZero {
                            operator: operator.clone(),
                        });
                    }
                    a.checked_div(b)
                }
                _ => {
                    return Err(VmError::UnsupportedToken {
                        token: operator.clone(),
                    })
                }
            };
            result.map(Number::Int).ok_or(VmError::IntegerOverflow {
                operation: format!("{} {} {}", a, operator.lexeme, b),
            })
        }
        (left, right) => {
            let (a, b) = (left.as_f64(), right.as_f64());
            let result = match kind {
                TerminalKind::ArithmeticOpPlus => a + b,
                TerminalKind::ArithmeticOpMinus => a - b,
                TerminalKind::ArithmeticOpMult => a * b,
                TerminalKind::ArithmeticOpDiv => {
                    if b == 0.0 {
                        return Err(VmError::DivisionByZero {
                            operator: operator.clone(),
                        });
                    }
                    a / b
                }
                _ => {
                    return Err(VmError::UnsupportedToken {
                        token: operator.clone(),
                    })
                }
            };
            Ok(Number::Float(result))
        }
    }
}

/// Evaluate `ast` with a fresh machine.
pub fn evaluate(ast: &SyntaxTree) -> Result<Token, VmError> {
    StackVm::new(ast).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::TokenChannel;
    use crate::lexer::Lexer;
    use crate::parser::ll1::Ll1Parser;

    fn ast(source: &str) -> SyntaxTree {
        let channel = TokenChannel::new();
        Lexer::new().run_reader(source.as_bytes(), &channel).unwrap();
        Ll1Parser::new(&channel).parse().unwrap().into_ast()
    }

    fn eval(source: &str) -> Result<(TerminalKind, String), VmError> {
        evaluate(&ast(source)).map(|t| (t.kind, t.lexeme))
    }

    fn int(lexeme: &str) -> (TerminalKind, String) {
        (TerminalKind::IntLiteral, lexeme.to_string())
    }

    fn float(lexeme: &str) -> (TerminalKind, String) {
        (TerminalKind::FloatLiteral, lexeme.to_string())
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(eval("3+4*2;").unwrap(), int("11"));
        assert_eq!(eval("(3+4)*2;").unwrap(), int("14"));
        assert_eq!(eval("((5))").unwrap(), int("5"));
    }

    #[test]
    fn test_left_to_right_for_non_commutative_ops() {
        assert_eq!(eval("10/2/5").unwrap(), int("1"));
        assert_eq!(eval("1-2-3").unwrap(), int("-4"));
        assert_eq!(eval("8-2+1").unwrap(), int("7"));
        assert_eq!(eval("7/2").unwrap(), int("3"));
        assert_eq!(eval("2-(3-4)").unwrap(), int("3"));
    }

    #[test]
    fn test_float_promotion() {
        assert_eq!(eval("1.5*2").unwrap(), float("3.0"));
        assert_eq!(eval("1+0.25").unwrap(), float("1.25"));
        assert_eq!(eval("2.0*2.0").unwrap(), float("4.0"));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("5/0;"), Err(VmError::DivisionByZero { .. })));
        assert!(matches!(eval("5.0/0"), Err(VmError::DivisionByZero { .. })));
        assert!(matches!(eval("1/(2-2)"), Err(VmError::DivisionByZero { .. })));
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            eval("9223372036854775807+1"),
            Err(VmError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval("99999999999999999999"),
            Err(VmError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_identifiers_have_no_value() {
        match eval("x+1") {
            Err(VmError::UnsupportedToken { token }) => assert_eq!(token.lexeme, "x"),
            other => panic!("expected unsupported token, got {:?}", other),
        }
    }

    #[test]
    fn test_arity_and_stack_balance() {
        let mut tree = SyntaxTree::new();
        let root = tree.set_root(Token::new("+", TerminalKind::ArithmeticOpPlus));
        tree.append_child(root, Token::new("1", TerminalKind::IntLiteral));
        assert!(matches!(
            evaluate(&tree),
            Err(VmError::Arity { available: 1, .. })
        ));

        let mut tree = SyntaxTree::new();
        let root = tree.set_root(Token::new("(", TerminalKind::OpeningBracket));
        tree.append_child(root, Token::new("1", TerminalKind::IntLiteral));
        tree.append_child(root, Token::new("2", TerminalKind::IntLiteral));
        assert!(matches!(
            evaluate(&tree),
            Err(VmError::UnbalancedStack { remaining: 2 })
        ));

        assert!(matches!(
            evaluate(&SyntaxTree::new()),
            Err(VmError::EmptyProgram)
        ));
    }

    #[test]
    fn test_run_pops_final_value() {
        let tree = ast("6*7");
        let mut vm = StackVm::new(&tree);
        assert_eq!(vm.run().unwrap().lexeme, "42");
        assert!(vm.operands().is_empty());
    }
}
