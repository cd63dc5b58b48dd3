//! Built-in atom types.

use super::{
    AtomType, FrameBehavior, OrderedBehavior, StructuralKind, TypeSpec, UnorderedBehavior,
};

static ORDERED: OrderedBehavior = OrderedBehavior;
static UNORDERED: UnorderedBehavior = UnorderedBehavior;
static FRAMED: FrameBehavior = FrameBehavior;

// =============================================================================
// NODES
// =============================================================================

pub static NODE_SPEC: TypeSpec = TypeSpec::new(1, "Node", StructuralKind::Node, None, &ORDERED);
pub static CONCEPT_NODE_SPEC: TypeSpec = TypeSpec::new(
    2,
    "ConceptNode",
    StructuralKind::Node,
    Some(&NODE_SPEC),
    &ORDERED,
);
pub static PREDICATE_NODE_SPEC: TypeSpec = TypeSpec::new(
    3,
    "PredicateNode",
    StructuralKind::Node,
    Some(&NODE_SPEC),
    &ORDERED,
);

pub const NODE: AtomType = AtomType::new(&NODE_SPEC);
pub const CONCEPT_NODE: AtomType = AtomType::new(&CONCEPT_NODE_SPEC);
pub const PREDICATE_NODE: AtomType = AtomType::new(&PREDICATE_NODE_SPEC);

// =============================================================================
// LINKS
// =============================================================================

pub static LINK_SPEC: TypeSpec = TypeSpec::new(16, "Link", StructuralKind::Link, None, &ORDERED);
pub static LIST_LINK_SPEC: TypeSpec = TypeSpec::new(
    17,
    "ListLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &ORDERED,
);
pub static EVALUATION_LINK_SPEC: TypeSpec = TypeSpec::new(
    18,
    "EvaluationLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &ORDERED,
);
pub static INHERITANCE_LINK_SPEC: TypeSpec = TypeSpec::new(
    19,
    "InheritanceLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &ORDERED,
);
pub static MEMBER_LINK_SPEC: TypeSpec = TypeSpec::new(
    20,
    "MemberLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &ORDERED,
);
pub static SET_LINK_SPEC: TypeSpec = TypeSpec::new(
    21,
    "SetLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &UNORDERED,
);
pub static STATE_LINK_SPEC: TypeSpec = TypeSpec::new(
    22,
    "StateLink",
    StructuralKind::Link,
    Some(&LINK_SPEC),
    &ORDERED,
);

pub const LINK: AtomType = AtomType::new(&LINK_SPEC);
pub const LIST_LINK: AtomType = AtomType::new(&LIST_LINK_SPEC);
pub const EVALUATION_LINK: AtomType = AtomType::new(&EVALUATION_LINK_SPEC);
pub const INHERITANCE_LINK: AtomType = AtomType::new(&INHERITANCE_LINK_SPEC);
pub const MEMBER_LINK: AtomType = AtomType::new(&MEMBER_LINK_SPEC);
pub const SET_LINK: AtomType = AtomType::new(&SET_LINK_SPEC);
pub const STATE_LINK: AtomType = AtomType::new(&STATE_LINK_SPEC);

// =============================================================================
// FRAMES
// =============================================================================

pub static FRAME_SPEC: TypeSpec =
    TypeSpec::new(32, "Frame", StructuralKind::Frame, None, &FRAMED);
pub static ATOM_SPACE_SPEC: TypeSpec = TypeSpec::new(
    33,
    "AtomSpace",
    StructuralKind::Frame,
    Some(&FRAME_SPEC),
    &FRAMED,
);

pub const FRAME: AtomType = AtomType::new(&FRAME_SPEC);
pub const ATOM_SPACE: AtomType = AtomType::new(&ATOM_SPACE_SPEC);

/// Every built-in type, in id order.
pub const BUILTIN_TYPES: [AtomType; 12] = [
    NODE,
    CONCEPT_NODE,
    PREDICATE_NODE,
    LINK,
    LIST_LINK,
    EVALUATION_LINK,
    INHERITANCE_LINK,
    MEMBER_LINK,
    SET_LINK,
    STATE_LINK,
    FRAME,
    ATOM_SPACE,
];
