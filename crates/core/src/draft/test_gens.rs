// Proptest generators for roster operations.

use proptest::prelude::*;

use crate::{
    models::{Constructor, Driver},
    money::Price,
};

/// Small id space so duplicates and removals of drafted ids are common.
pub fn id() -> impl Strategy<Value = u32> {
    0u32..10
}

/// Prices up to 40.0M, so the budget runs out within a handful of adds.
pub fn price() -> impl Strategy<Value = Price> {
    (0u32..=400).prop_map(Price::from_tenths)
}

pub fn driver() -> impl Strategy<Value = Driver> {
    (id(), price()).prop_map(|(id, price)| Driver::new(id, format!("Driver {id}"), "Team", price))
}

pub fn constructor() -> impl Strategy<Value = Constructor> {
    (id(), price()).prop_map(|(id, price)| Constructor::new(id, format!("Team {id}"), price))
}

#[derive(Debug, Clone)]
pub enum Op {
    AddDriver(Driver),
    RemoveDriver(u32),
    AddConstructor(Constructor),
    RemoveConstructor(u32),
    Reorder(usize, usize),
    Clear,
}

pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => driver().prop_map(Op::AddDriver),
        2 => id().prop_map(Op::RemoveDriver),
        3 => constructor().prop_map(Op::AddConstructor),
        1 => id().prop_map(Op::RemoveConstructor),
        2 => (0usize..7, 0usize..7).prop_map(|(source, dest)| Op::Reorder(source, dest)),
        1 => Just(Op::Clear),
    ]
}

pub fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..60)
}
