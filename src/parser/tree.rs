//! Child-sibling syntax tree stored in an arena
//!
//! Nodes live in a `Vec` and link to each other by index: every node holds
//! its first child and its next sibling, which encodes any branching factor
//! without per-node child vectors. Rewrites only relink indices; nodes that
//! drop out of the tree stay in the arena until the whole tree is dropped.
//!
//! # Incremental construction
//!
//! The LL(1) parser calls [`SyntaxTree::insert`] once per expansion. The tree
//! keeps, per nonterminal, the nodes still waiting to be expanded. The parser
//! always expands the nonterminal nearest the top of its symbol stack, which
//! is the most recently created pending node of that name, so each list is
//! used as a stack.
//!
//! # AST conversion
//!
//! [`SyntaxTree::into_ast`] runs two rewrites:
//!
//! 1. [`collapse`](SyntaxTree::collapse) removes every nonterminal node. A
//!    node's converted sibling becomes its parent-side replacement and
//!    inherits the node's converted children ahead of its own, so operators
//!    end up above their operands.
//! 2. [`reassociate`](SyntaxTree::reassociate) rotates the right-nested
//!    chains that collapsing produces for same-precedence operators
//!    (`10/2/5` comes out as `/[10, /[2, 5]]`) into left-nested form.

use super::errors::ParseError;
use super::grammar::NonTerminal;
use crate::lexer::token::{TerminalKind, Token};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SyntaxTreeNode {
    pub value: Token,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl SyntaxTreeNode {
    fn new(value: Token) -> Self {
        SyntaxTreeNode {
            value,
            first_child: None,
            next_sibling: None,
        }
    }
}

/// Iterator over a node's children, following sibling links.
pub struct Children<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.nodes[id].next_sibling;
        Some(id)
    }
}

/// Operators sharing a class associate with each other in a chain.
fn precedence_class(kind: TerminalKind) -> Option<u8> {
    match kind {
        TerminalKind::ArithmeticOpPlus | TerminalKind::ArithmeticOpMinus => Some(1),
        TerminalKind::ArithmeticOpMult | TerminalKind::ArithmeticOpDiv => Some(2),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxTreeNode>,
    root: Option<NodeId>,
    pending: FxHashMap<NonTerminal, Vec<NodeId>>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxTreeNode {
        &self.nodes[id]
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id].value
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes[id].first_child,
        }
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.preorder().len()
    }

    fn push_node(&mut self, value: Token) -> NodeId {
        self.nodes.push(SyntaxTreeNode::new(value));
        self.nodes.len() - 1
    }

    /// Starts a new tree with `value` at the root, discarding any previous
    /// contents.
    pub fn set_root(&mut self, value: Token) -> NodeId {
        self.nodes.clear();
        self.pending.clear();
        let root = self.push_node(value);
        self.root = Some(root);
        root
    }

    /// Appends `value` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, value: Token) -> NodeId {
        let child = self.push_node(value);
        match self.nodes[parent].first_child {
            None => self.nodes[parent].first_child = Some(child),
            Some(first) => {
                let tail = self.chain_tail(first);
                self.nodes[tail].next_sibling = Some(child);
            }
        }
        child
    }

    fn chain_tail(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.nodes[id].next_sibling {
            id = next;
        }
        id
    }

    /// Record one expansion.
    ///
    /// With no `parent`, the first token becomes the root. Otherwise the most
    /// recent pending node for `parent` receives `children` in order, and the
    /// nonterminal children become pending themselves. An ε expansion passes
    /// no children and simply closes the pending node.
    pub fn insert(&mut self, parent: Option<NonTerminal>, children: Vec<Token>) -> Result<(), ParseError> {
        let Some(parent) = parent else {
            if let Some(first) = children.into_iter().next() {
                let root = self.set_root(first);
                self.track(root)?;
            }
            return Ok(());
        };

        let node = self
            .pending
            .get_mut(&parent)
            .and_then(Vec::pop)
            .ok_or(ParseError::NoPendingNode { nonterminal: parent })?;

        let created: Vec<NodeId> = children
            .into_iter()
            .map(|token| self.append_child(node, token))
            .collect();

        // Leftmost child on top, matching the order the parser expands them
        for &child in created.iter().rev() {
            self.track(child)?;
        }
        Ok(())
    }

    fn track(&mut self, id: NodeId) -> Result<(), ParseError> {
        let value = &self.nodes[id].value;
        if !value.is_nonterminal() {
            return Ok(());
        }
        let nonterminal =
            NonTerminal::from_name(&value.lexeme).ok_or_else(|| ParseError::UnknownNonTerminal {
                name: value.lexeme.clone(),
            })?;
        self.pending.entry(nonterminal).or_default().push(id);
        Ok(())
    }

    /// Whether some nonterminal node has not been expanded yet.
    pub fn has_pending(&self) -> bool {
        self.pending.values().any(|nodes| !nodes.is_empty())
    }

    /// Remove every nonterminal node, keeping terminal order.
    ///
    /// Each node is rewritten from the rewritten forms of its child chain
    /// and its sibling chain, so the walk visits nodes after everything
    /// reachable below and to the right of them.
    pub fn collapse(&mut self) {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].first_child);
            stack.extend(self.nodes[id].next_sibling);
        }

        let mut collapsed: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for &id in order.iter().rev() {
            let replacement = self.collapse_node(id, &collapsed);
            collapsed[id] = replacement;
        }
        self.root = self.root.and_then(|root| collapsed[root]);
    }

    fn collapse_node(&mut self, id: NodeId, collapsed: &[Option<NodeId>]) -> Option<NodeId> {
        let next = self.nodes[id].next_sibling.and_then(|n| collapsed[n]);
        let children = self.nodes[id].first_child.and_then(|c| collapsed[c]);
        self.nodes[id].next_sibling = None;

        let merged = match (children, next) {
            (Some(children), Some(next)) => {
                let tail = self.chain_tail(children);
                self.nodes[tail].next_sibling = self.nodes[next].first_child;
                self.nodes[next].first_child = Some(children);
                self.nodes[id].first_child = Some(next);
                true
            }
            (children, next) => {
                self.nodes[id].first_child = children.or(next);
                false
            }
        };

        if self.nodes[id].value.is_nonterminal() {
            return if merged { next } else { children.or(next) };
        }
        Some(id)
    }

    /// Turn right-nested chains of same-precedence operators left-nested.
    pub fn reassociate(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let root = self.rotate_chain(root);
        self.nodes[root].next_sibling = None;
        self.root = Some(root);

        // Every node on the stack is already rotated; its children are not.
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children: Vec<NodeId> = self.children(id).collect();
            let children: Vec<NodeId> = children
                .into_iter()
                .map(|child| self.rotate_chain(child))
                .collect();
            self.set_children(id, &children);
            stack.extend(children);
        }
    }

    fn rotate_chain(&mut self, mut id: NodeId) -> NodeId {
        // op[a, op'[b, c]]  =>  op'[op[a, b], c]
        while let Some([left, right, inner_left, inner_right]) = self.rotation(id) {
            self.set_children(id, &[left, inner_left]);
            self.set_children(right, &[id, inner_right]);
            id = right;
        }
        id
    }

    fn rotation(&self, id: NodeId) -> Option<[NodeId; 4]> {
        let class = precedence_class(self.nodes[id].value.kind)?;
        let [left, right] = self.binary_children(id)?;
        if precedence_class(self.nodes[right].value.kind)? != class {
            return None;
        }
        let [inner_left, inner_right] = self.binary_children(right)?;
        Some([left, right, inner_left, inner_right])
    }

    fn binary_children(&self, id: NodeId) -> Option<[NodeId; 2]> {
        let children: Vec<NodeId> = self.children(id).collect();
        match children[..] {
            [left, right] => Some([left, right]),
            _ => None,
        }
    }

    fn set_children(&mut self, parent: NodeId, children: &[NodeId]) {
        self.nodes[parent].first_child = children.first().copied();
        for pair in children.windows(2) {
            self.nodes[pair[0]].next_sibling = Some(pair[1]);
        }
        if let Some(&last) = children.last() {
            self.nodes[last].next_sibling = None;
        }
    }

    /// Collapse and reassociate, yielding the tree the evaluator runs.
    pub fn into_ast(mut self) -> SyntaxTree {
        self.pending.clear();
        self.collapse();
        self.reassociate();
        self
    }

    /// Node ids in pre-order (node, then its children left to right).
    pub fn preorder(&self) -> Vec<NodeId> {
        self.outline().into_iter().map(|(_, id)| id).collect()
    }

    /// Pre-order node ids paired with their depth below the root.
    pub fn outline(&self) -> Vec<(usize, NodeId)> {
        let mut order = Vec::new();
        let mut stack: Vec<(usize, NodeId)> = self.root.map(|r| (0, r)).into_iter().collect();
        while let Some((depth, id)) = stack.pop() {
            order.push((depth, id));
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev().map(|c| (depth + 1, c)));
        }
        order
    }

    /// Node ids in post-order (children left to right, then the node).
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = self.root.map(|r| (r, false)).into_iter().collect();
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev().map(|c| (c, false)));
        }
        order
    }

    /// Terminal tokens in pre-order.
    pub fn terminals(&self) -> Vec<&Token> {
        self.preorder()
            .into_iter()
            .map(|id| &self.nodes[id].value)
            .filter(|token| !token.is_nonterminal())
            .collect()
    }

    pub fn contains_nonterminal(&self) -> bool {
        self.preorder()
            .into_iter()
            .any(|id| self.nodes[id].value.is_nonterminal())
    }

    /// Nodes grouped by depth, each level left to right.
    pub fn level_order(&self) -> Vec<Vec<NodeId>> {
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        let mut queue: VecDeque<(usize, NodeId)> = self.root.map(|r| (0, r)).into_iter().collect();
        while let Some((depth, id)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(id);
            queue.extend(self.children(id).map(|c| (depth + 1, c)));
        }
        levels
    }

    /// One line per level, each node written as `lexeme(childCount)`.
    pub fn render_levels(&self) -> String {
        self.level_order()
            .iter()
            .map(|level| {
                level
                    .iter()
                    .map(|&id| format!("{}({})", self.nodes[id].value.lexeme, self.children(id).count()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parenthesized rendering, e.g. `(+ 3 (* 4 2))`.
    pub fn to_sexpr(&self) -> String {
        let mut rendered: Vec<String> = Vec::new();
        for id in self.postorder() {
            let lexeme = &self.nodes[id].value.lexeme;
            let arity = self.children(id).count();
            if arity == 0 {
                rendered.push(lexeme.clone());
                continue;
            }
            let children = rendered.split_off(rendered.len() - arity);
            rendered.push(format!("({} {})", lexeme, children.join(" ")));
        }
        rendered.pop().unwrap_or_else(|| String::from("()"))
    }
}
