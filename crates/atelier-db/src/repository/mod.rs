//! # Repository Layer
//!
//! One repository per aggregate. Repositories own a pool clone and serve
//! standalone reads/writes; multi-statement writes are composed by the
//! service layer from the `*_tx` functions, which operate on an explicit
//! connection so they can run inside the caller's transaction.

pub mod contact;
pub mod coupon;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod payment_term;
pub mod product;
pub mod purchase;
pub mod sequence;
pub mod settings;
