//! A DOM-like tree of `Cell`-linked nodes, allocated out of an arena so that
//! links can be plain shared references. Based on the `arena-tree` design
//! from rust-forest.

use std::cell::Cell;
use std::fmt;
use std::ptr;

pub struct Node<'a, T: 'a> {
    parent: Cell<Option<&'a Node<'a, T>>>,
    previous_sibling: Cell<Option<&'a Node<'a, T>>>,
    next_sibling: Cell<Option<&'a Node<'a, T>>>,
    first_child: Cell<Option<&'a Node<'a, T>>>,
    last_child: Cell<Option<&'a Node<'a, T>>>,

    /// The data held by the node itself.
    pub data: T,
}

impl<'a, T> Node<'a, T> {
    pub fn new(data: T) -> Node<'a, T> {
        Node {
            parent: Cell::new(None),
            previous_sibling: Cell::new(None),
            next_sibling: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            data,
        }
    }

    pub fn parent(&self) -> Option<&'a Node<'a, T>> {
        self.parent.get()
    }

    pub fn first_child(&self) -> Option<&'a Node<'a, T>> {
        self.first_child.get()
    }

    pub fn last_child(&self) -> Option<&'a Node<'a, T>> {
        self.last_child.get()
    }

    pub fn previous_sibling(&self) -> Option<&'a Node<'a, T>> {
        self.previous_sibling.get()
    }

    pub fn next_sibling(&self) -> Option<&'a Node<'a, T>> {
        self.next_sibling.get()
    }

    /// Reference equality; two nodes holding equal data are still distinct.
    pub fn same_node(&self, other: &Node<'a, T>) -> bool {
        ptr::eq(self, other)
    }

    /// Detaches a node from its parent and siblings. Its children stay put.
    pub fn detach(&self) {
        let parent = self.parent.take();
        let previous_sibling = self.previous_sibling.take();
        let next_sibling = self.next_sibling.take();

        if let Some(next_sibling) = next_sibling {
            next_sibling.previous_sibling.set(previous_sibling);
        } else if let Some(parent) = parent {
            parent.last_child.set(previous_sibling);
        }

        if let Some(previous_sibling) = previous_sibling {
            previous_sibling.next_sibling.set(next_sibling);
        } else if let Some(parent) = parent {
            parent.first_child.set(next_sibling);
        }
    }

    /// Appends a new child, detaching it from its previous position first.
    pub fn append(&'a self, new_child: &'a Node<'a, T>) {
        new_child.detach();
        new_child.parent.set(Some(self));
        if let Some(last_child) = self.last_child.take() {
            new_child.previous_sibling.set(Some(last_child));
            last_child.next_sibling.set(Some(new_child));
        } else {
            self.first_child.set(Some(new_child));
        }
        self.last_child.set(Some(new_child));
    }

    pub fn children(&self) -> Children<'a, T> {
        Children(self.first_child())
    }

    pub fn reverse_children(&'a self) -> ReverseChildren<'a, T> {
        ReverseChildren(self.last_child())
    }

    /// All nodes in the subtree rooted at this one, in document order,
    /// including the root itself.
    pub fn descendants(&'a self) -> Descendants<'a, T> {
        Descendants(self.traverse())
    }

    pub fn traverse(&'a self) -> Traverse<'a, T> {
        Traverse {
            root: self,
            next: Some(NodeEdge::Start(self)),
        }
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Node<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.data.fmt(f)?;
        if self.first_child().is_some() {
            f.debug_list().entries(self.children()).finish()?;
        }
        Ok(())
    }
}

pub struct Children<'a, T: 'a>(Option<&'a Node<'a, T>>);

impl<'a, T> Iterator for Children<'a, T> {
    type Item = &'a Node<'a, T>;

    fn next(&mut self) -> Option<&'a Node<'a, T>> {
        let node = self.0.take()?;
        self.0 = node.next_sibling();
        Some(node)
    }
}

pub struct ReverseChildren<'a, T: 'a>(Option<&'a Node<'a, T>>);

impl<'a, T> Iterator for ReverseChildren<'a, T> {
    type Item = &'a Node<'a, T>;

    fn next(&mut self) -> Option<&'a Node<'a, T>> {
        let node = self.0.take()?;
        self.0 = node.previous_sibling();
        Some(node)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NodeEdge<'a, T: 'a> {
    /// Yielded on the way down, before the node's descendants.
    Start(&'a Node<'a, T>),
    /// Yielded on the way back up, after the node's descendants.
    End(&'a Node<'a, T>),
}

pub struct Traverse<'a, T: 'a> {
    root: &'a Node<'a, T>,
    next: Option<NodeEdge<'a, T>>,
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = NodeEdge<'a, T>;

    fn next(&mut self) -> Option<NodeEdge<'a, T>> {
        let item = self.next.take()?;
        self.next = match item {
            NodeEdge::Start(node) => match node.first_child() {
                Some(child) => Some(NodeEdge::Start(child)),
                None => Some(NodeEdge::End(node)),
            },
            NodeEdge::End(node) => {
                if node.same_node(self.root) {
                    None
                } else {
                    match node.next_sibling() {
                        Some(sibling) => Some(NodeEdge::Start(sibling)),
                        None => node.parent().map(NodeEdge::End),
                    }
                }
            }
        };
        Some(item)
    }
}

pub struct Descendants<'a, T: 'a>(Traverse<'a, T>);

impl<'a, T> Iterator for Descendants<'a, T> {
    type Item = &'a Node<'a, T>;

    fn next(&mut self) -> Option<&'a Node<'a, T>> {
        loop {
            match self.0.next()? {
                NodeEdge::Start(node) => return Some(node),
                NodeEdge::End(_) => (),
            }
        }
    }
}
