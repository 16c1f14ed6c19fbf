//! A generic red-black tree with threaded predecessor/next pointers.
//!
//! Spec §4.1 calls for a balanced ordered tree that (a) lets the caller
//! decide *where* a new node goes — the tree itself never computes a key —
//! and (b) gives O(1) access to each node's in-order neighbors. This is used
//! twice in the engine: as the beachline (`beachline.rs`, keyed by a range
//! that moves with the sweepline) and as the circle-event queue
//! (`events.rs`, keyed by `(y, x)`).
//!
//! Nodes live in a [`slab::Slab`] arena rather than behind `Rc`/`RefCell` —
//! this is the generational-index design spec §9 recommends in place of the
//! original implementation's garbage-collected weak references. A `NodeId`
//! is just a `usize`; once a node is [`OrderedTree::remove`]d its id is
//! reused by the slab on the next insert, so callers must not hold onto a
//! `NodeId` across a `remove` they didn't perform themselves.

use slab::Slab;

/// An opaque handle to a node in an [`OrderedTree`].
pub type NodeId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

struct Node<T> {
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    color: Color,
    data: T,
}

/// A balanced ordered tree with no intrinsic key: callers locate the
/// insertion point themselves (see module docs) and the tree maintains
/// order, balance, and the `prev`/`next` threads.
pub struct OrderedTree<T> {
    nodes: Slab<Node<T>>,
    root: Option<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedTree<T> {
    pub fn new() -> Self {
        OrderedTree {
            nodes: Slab::new(),
            root: None,
            head: None,
            tail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The in-order minimum over the whole tree, O(1).
    pub fn first(&self) -> Option<NodeId> {
        self.head
    }

    /// The in-order maximum over the whole tree, O(1).
    pub fn last(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id].data
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id].data
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].prev
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].right
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Descend leftmost from `id`.
    pub fn first_of_subtree(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(left) = self.nodes[current].left {
            current = left;
        }
        current
    }

    /// Descend rightmost from `id`.
    pub fn last_of_subtree(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(right) = self.nodes[current].right {
            current = right;
        }
        current
    }

    /// Places `data` immediately after `anchor` in in-order position.
    ///
    /// `anchor = None` with an empty tree makes `data` the root; `anchor =
    /// None` with a non-empty tree places `data` before the current
    /// minimum. The tree is rebalanced after insertion.
    pub fn insert_after(&mut self, anchor: Option<NodeId>, data: T) -> NodeId {
        let z = self.nodes.insert(Node {
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
            color: Color::Red,
            data,
        });

        // Thread z into the prev/next list first (this determines z's
        // neighbors regardless of how the BST attach below is structured).
        let (prev, next) = match anchor {
            None => (None, self.head),
            Some(a) => (Some(a), self.nodes[a].next),
        };
        self.nodes[z].prev = prev;
        self.nodes[z].next = next;
        match prev {
            Some(p) => self.nodes[p].next = Some(z),
            None => self.head = Some(z),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(z),
            None => self.tail = Some(z),
        }

        // Attach z into the BST shape as the successor of `anchor`: if
        // anchor has no right child, z becomes that right child; otherwise
        // z becomes the left child of anchor's in-order successor (which,
        // being the leftmost node of anchor's right subtree, never has a
        // left child of its own). Anchor = None attaches before the
        // tree's current minimum, symmetric to the above.
        match anchor {
            None => match self.root {
                None => {
                    self.root = Some(z);
                }
                Some(root) => {
                    let min = self.first_of_subtree(root);
                    self.nodes[min].left = Some(z);
                    self.nodes[z].parent = Some(min);
                }
            },
            Some(a) => {
                if self.nodes[a].right.is_none() {
                    self.nodes[a].right = Some(z);
                    self.nodes[z].parent = Some(a);
                } else {
                    let succ = self.first_of_subtree(self.nodes[a].right.unwrap());
                    self.nodes[succ].left = Some(z);
                    self.nodes[z].parent = Some(succ);
                }
            }
        }

        self.insert_fixup(z);
        z
    }

    /// Removes `node` from the tree, rebalances, and returns its data. The
    /// caller may still hold the value to re-enqueue elsewhere; the tree
    /// never owned it beyond its slot.
    pub fn remove(&mut self, node: NodeId) -> T {
        // Unthread prev/next first; this is independent of the BST surgery.
        let (prev, next) = (self.nodes[node].prev, self.nodes[node].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        self.bst_delete(node);
        self.nodes.remove(node).data
    }

    // ---- red-black internals ----
    // Standard CLRS-style insert/delete fixups, adapted to `Option<NodeId>`
    // links with "no node" read as black (the conventional NIL-is-black
    // sentinel, without a separate dummy node wasting a slab slot).

    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.nodes[id].color)
    }

    fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.nodes[id].color = color;
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x].right.expect("rotate_left requires a right child");
        self.nodes[x].right = self.nodes[y].left;
        if let Some(yl) = self.nodes[y].left {
            self.nodes[yl].parent = Some(x);
        }
        self.nodes[y].parent = self.nodes[x].parent;
        match self.nodes[x].parent {
            None => self.root = Some(y),
            Some(p) if self.nodes[p].left == Some(x) => self.nodes[p].left = Some(y),
            Some(p) => self.nodes[p].right = Some(y),
        }
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x].left.expect("rotate_right requires a left child");
        self.nodes[x].left = self.nodes[y].right;
        if let Some(yr) = self.nodes[y].right {
            self.nodes[yr].parent = Some(x);
        }
        self.nodes[y].parent = self.nodes[x].parent;
        match self.nodes[x].parent {
            None => self.root = Some(y),
            Some(p) if self.nodes[p].right == Some(x) => self.nodes[p].right = Some(y),
            Some(p) => self.nodes[p].left = Some(y),
        }
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color_of(self.nodes[z].parent) == Color::Red {
            let parent = self.nodes[z].parent.unwrap();
            let grandparent = self.nodes[parent].parent.expect("red root is impossible");
            if Some(parent) == self.nodes[grandparent].left {
                let uncle = self.nodes[grandparent].right;
                if self.color_of(uncle) == Color::Red {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    z = grandparent;
                } else {
                    if Some(z) == self.nodes[parent].right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.nodes[z].parent.unwrap();
                    let grandparent = self.nodes[parent].parent.unwrap();
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.color_of(uncle) == Color::Red {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    z = grandparent;
                } else {
                    if Some(z) == self.nodes[parent].left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.nodes[z].parent.unwrap();
                    let grandparent = self.nodes[parent].parent.unwrap();
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.nodes[u].parent;
        match parent {
            None => self.root = v,
            Some(p) if self.nodes[p].left == Some(u) => self.nodes[p].left = v,
            Some(p) => self.nodes[p].right = v,
        }
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }

    fn bst_delete(&mut self, z: NodeId) {
        let mut y = z;
        let mut y_original_color = self.nodes[y].color;
        let x: Option<NodeId>;
        let x_parent: Option<NodeId>;
        // Which child slot of `x_parent` does `x` (possibly a phantom nil)
        // occupy? Threaded explicitly rather than re-derived from tree
        // state, since two `None` children are otherwise indistinguishable.
        let x_is_left: bool;

        if self.nodes[z].left.is_none() {
            x = self.nodes[z].right;
            x_parent = self.nodes[z].parent;
            x_is_left = x_parent.is_some_and(|p| self.nodes[p].left == Some(z));
            self.transplant(z, x);
        } else if self.nodes[z].right.is_none() {
            x = self.nodes[z].left;
            x_parent = self.nodes[z].parent;
            x_is_left = x_parent.is_some_and(|p| self.nodes[p].left == Some(z));
            self.transplant(z, x);
        } else {
            y = self.first_of_subtree(self.nodes[z].right.unwrap());
            y_original_color = self.nodes[y].color;
            x = self.nodes[y].right;
            if self.nodes[y].parent == Some(z) {
                // y is z's direct right child (with no left child of its
                // own); x inherits y's right slot once y moves into z's
                // place.
                x_parent = Some(y);
                x_is_left = false;
                if let Some(x) = x {
                    self.nodes[x].parent = Some(y);
                }
            } else {
                // y is the minimum of z's right subtree but not its direct
                // child, so y always sits in its parent's left slot.
                x_parent = self.nodes[y].parent;
                x_is_left = true;
                self.transplant(y, self.nodes[y].right);
                self.nodes[y].right = self.nodes[z].right;
                if let Some(yr) = self.nodes[y].right {
                    self.nodes[yr].parent = Some(y);
                }
            }
            self.transplant(z, Some(y));
            self.nodes[y].left = self.nodes[z].left;
            if let Some(yl) = self.nodes[y].left {
                self.nodes[yl].parent = Some(y);
            }
            self.nodes[y].color = self.nodes[z].color;
        }

        if y_original_color == Color::Black {
            self.delete_fixup(x, x_parent, x_is_left);
        }
    }

    fn delete_fixup(&mut self, mut x: Option<NodeId>, mut x_parent: Option<NodeId>, mut x_is_left: bool) {
        while x != self.root && self.color_of(x) == Color::Black {
            let parent = match x_parent {
                Some(p) => p,
                None => break,
            };
            if x_is_left {
                let mut sibling = self.nodes[parent].right.expect("sibling must exist");
                if self.color_of(Some(sibling)) == Color::Red {
                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(parent), Color::Red);
                    self.rotate_left(parent);
                    sibling = self.nodes[parent].right.expect("sibling must exist");
                }
                if self.color_of(self.nodes[sibling].left) == Color::Black
                    && self.color_of(self.nodes[sibling].right) == Color::Black
                {
                    self.set_color(Some(sibling), Color::Red);
                    x = Some(parent);
                    x_parent = self.nodes[parent].parent;
                    x_is_left = x_parent.is_some_and(|gp| self.nodes[gp].left == Some(parent));
                } else {
                    if self.color_of(self.nodes[sibling].right) == Color::Black {
                        self.set_color(self.nodes[sibling].left, Color::Black);
                        self.set_color(Some(sibling), Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.nodes[parent].right.expect("sibling must exist");
                    }
                    self.set_color(Some(sibling), self.nodes[parent].color);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(self.nodes[sibling].right, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                    x_parent = None;
                }
            } else {
                let mut sibling = self.nodes[parent].left.expect("sibling must exist");
                if self.color_of(Some(sibling)) == Color::Red {
                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(parent), Color::Red);
                    self.rotate_right(parent);
                    sibling = self.nodes[parent].left.expect("sibling must exist");
                }
                if self.color_of(self.nodes[sibling].right) == Color::Black
                    && self.color_of(self.nodes[sibling].left) == Color::Black
                {
                    self.set_color(Some(sibling), Color::Red);
                    x = Some(parent);
                    x_parent = self.nodes[parent].parent;
                    x_is_left = x_parent.is_some_and(|gp| self.nodes[gp].left == Some(parent));
                } else {
                    if self.color_of(self.nodes[sibling].left) == Color::Black {
                        self.set_color(self.nodes[sibling].right, Color::Black);
                        self.set_color(Some(sibling), Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.nodes[parent].left.expect("sibling must exist");
                    }
                    self.set_color(Some(sibling), self.nodes[parent].color);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(self.nodes[sibling].left, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                    x_parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inorder(tree: &OrderedTree<i32>) -> Vec<i32> {
        let mut out = vec![];
        let mut cur = tree.first();
        while let Some(id) = cur {
            out.push(*tree.get(id));
            cur = tree.next(id);
        }
        out
    }

    #[test]
    fn insert_after_builds_in_order_sequence() {
        let mut tree: OrderedTree<i32> = OrderedTree::new();
        let a = tree.insert_after(None, 1);
        let b = tree.insert_after(Some(a), 3);
        tree.insert_after(Some(a), 2);
        tree.insert_after(None, 0);
        let _ = b;
        assert_eq!(inorder(&tree), vec![0, 1, 2, 3]);
        assert_eq!(tree.first().map(|id| *tree.get(id)), Some(0));
        assert_eq!(tree.last().map(|id| *tree.get(id)), Some(3));
    }

    #[test]
    fn remove_preserves_neighbor_threads() {
        let mut tree: OrderedTree<i32> = OrderedTree::new();
        let a = tree.insert_after(None, 1);
        let b = tree.insert_after(Some(a), 2);
        let c = tree.insert_after(Some(b), 3);
        tree.remove(b);
        assert_eq!(inorder(&tree), vec![1, 3]);
        assert_eq!(tree.next(a), Some(c));
        assert_eq!(tree.prev(c), Some(a));
    }

    #[test]
    fn large_sequential_insert_and_delete_stays_in_order() {
        let mut tree: OrderedTree<i32> = OrderedTree::new();
        let mut last = None;
        let mut ids = vec![];
        for i in 0..500 {
            last = Some(tree.insert_after(last, i));
            ids.push(last.unwrap());
        }
        assert_eq!(inorder(&tree), (0..500).collect::<Vec<_>>());

        // remove every third node and check the remaining sequence is
        // still sorted and threaded correctly.
        for (i, id) in ids.into_iter().enumerate() {
            if i % 3 == 0 {
                tree.remove(id);
            }
        }
        let remaining = inorder(&tree);
        let mut sorted = remaining.clone();
        sorted.sort();
        assert_eq!(remaining, sorted);
        assert_eq!(remaining.len(), 500 - (0..500).step_by(3).count());
    }
}
