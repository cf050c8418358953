use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::PlayerId;
use jass_core::model::turn_state::TurnState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub state: TurnState,
    /// Searching player's cards still in hand at `state`.
    pub hand: CardSet,
    /// Legal moves from `state` not yet expanded into children.
    pub unused: CardSet,
    /// Player whose card led to this node; `None` for the root.
    pub mover: Option<PlayerId>,
    pub children: Vec<(Card, NodeId)>,
    pub visits: u32,
    pub total: f64,
}

impl Node {
    pub fn new(state: TurnState, hand: CardSet, unused: CardSet, mover: Option<PlayerId>) -> Self {
        Self {
            state,
            hand,
            unused,
            mover,
            children: Vec::new(),
            visits: 0,
            total: 0.0,
        }
    }

    fn average(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / f64::from(self.visits)
        }
    }
}

/// Arena owning every node of one search.
#[derive(Debug, Default)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn with_root(root: Node) -> Self {
        Self { nodes: vec![root] }
    }

    pub const fn root() -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn add_child(&mut self, parent: NodeId, card: Card, child: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.nodes[parent.0].children.push((card, id));
        id
    }

    /// Child of `parent` maximising UCB1; the first child wins ties.
    pub fn best_child(&self, parent: NodeId, exploration: f64) -> Option<(Card, NodeId)> {
        let parent_visits = f64::from(self.node(parent).visits.max(1));
        let mut best: Option<((Card, NodeId), f64)> = None;
        for &(card, id) in &self.node(parent).children {
            let child = self.node(id);
            let value = if child.visits == 0 {
                f64::INFINITY
            } else {
                child.average()
                    + exploration * (2.0 * parent_visits.ln() / f64::from(child.visits)).sqrt()
            };
            if best.is_none_or(|(_, current)| value > current) {
                best = Some(((card, id), value));
            }
        }
        best.map(|(choice, _)| choice)
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, Tree};
    use jass_core::model::card::Card;
    use jass_core::model::card_set::CardSet;
    use jass_core::model::player::PlayerId;
    use jass_core::model::rank::Rank;
    use jass_core::model::score::Score;
    use jass_core::model::suit::Suit;
    use jass_core::model::turn_state::TurnState;

    fn leaf(visits: u32, total: f64) -> Node {
        let state = TurnState::initial(Suit::Spades, Score::INITIAL, PlayerId::Player1);
        let mut node = Node::new(state, CardSet::EMPTY, CardSet::EMPTY, Some(PlayerId::Player1));
        node.visits = visits;
        node.total = total;
        node
    }

    #[test]
    fn exploitation_only_picks_best_average() {
        let mut tree = Tree::with_root(leaf(30, 0.0));
        let root = Tree::root();
        let low = Card::new(Suit::Hearts, Rank::Six);
        let high = Card::new(Suit::Hearts, Rank::Ace);
        tree.add_child(root, low, leaf(20, 20.0 * 50.0));
        tree.add_child(root, high, leaf(10, 10.0 * 60.0));
        assert_eq!(tree.best_child(root, 0.0).map(|(card, _)| card), Some(high));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn exploration_favours_rarely_visited_child() {
        let mut tree = Tree::with_root(leaf(101, 0.0));
        let root = Tree::root();
        let busy = Card::new(Suit::Clubs, Rank::Ten);
        let rare = Card::new(Suit::Clubs, Rank::Jack);
        tree.add_child(root, busy, leaf(100, 100.0 * 70.0));
        tree.add_child(root, rare, leaf(1, 60.0));
        assert_eq!(tree.best_child(root, 0.0).map(|(card, _)| card), Some(busy));
        assert_eq!(tree.best_child(root, 40.0).map(|(card, _)| card), Some(rare));
    }

    #[test]
    fn childless_node_has_no_best_child() {
        let tree = Tree::with_root(leaf(1, 0.0));
        assert_eq!(tree.best_child(Tree::root(), 40.0), None);
    }
}
