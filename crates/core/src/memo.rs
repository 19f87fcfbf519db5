//! Key derivation for the process-local memo.
//!
//! A memoized endpoint declares which of its positional arguments take part
//! in the key. The positional arguments are the request context fields
//! followed by the endpoint's own arguments.

use crate::RequestContext;

/// One positional argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoArg {
    Str(String),
    Int(i64),
    List(Vec<String>),
    Absent,
}

/// Hashable form of a [`MemoArg`]. Lists collapse into one `;` joined token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoToken {
    Str(String),
    Int(i64),
    Absent,
}

impl From<MemoArg> for MemoToken {
    fn from(arg: MemoArg) -> Self {
        match arg {
            MemoArg::Str(s) => MemoToken::Str(s),
            MemoArg::Int(i) => MemoToken::Int(i),
            MemoArg::List(items) => MemoToken::Str(items.join(";")),
            MemoArg::Absent => MemoToken::Absent,
        }
    }
}

impl From<&str> for MemoArg {
    fn from(value: &str) -> Self {
        MemoArg::Str(value.to_string())
    }
}

impl From<&String> for MemoArg {
    fn from(value: &String) -> Self {
        MemoArg::Str(value.clone())
    }
}

impl From<i32> for MemoArg {
    fn from(value: i32) -> Self {
        MemoArg::Int(value.into())
    }
}

impl From<&Vec<String>> for MemoArg {
    fn from(value: &Vec<String>) -> Self {
        MemoArg::List(value.clone())
    }
}

impl<T> From<Option<T>> for MemoArg
where
    T: Into<MemoArg>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(MemoArg::Absent)
    }
}

/// A position taking part in a memo key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoField {
    AppVersion,
    Country,
    Lang,
    PreferLangs,
    UserId,
    /// Endpoint argument by index.
    Arg(usize),
}

/// Derived memo key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey(Vec<MemoToken>);

/// Endpoint arguments addressable by index.
pub trait MemoArgs {
    fn memo_arg(&self, index: usize) -> MemoArg;
}

impl MemoArgs for () {
    fn memo_arg(&self, _index: usize) -> MemoArg {
        MemoArg::Absent
    }
}

/// Derives the memo key of a call from the declared positions.
pub fn memo_key<A: MemoArgs>(fields: &[MemoField], ctx: &RequestContext, args: &A) -> MemoKey {
    MemoKey(
        fields
            .iter()
            .map(|field| {
                let arg = match field {
                    MemoField::AppVersion => MemoArg::Int(ctx.app_version.into()),
                    MemoField::Country => MemoArg::from(&ctx.country),
                    MemoField::Lang => MemoArg::from(&ctx.lang),
                    MemoField::PreferLangs => MemoArg::from(&ctx.prefer_langs),
                    MemoField::UserId => MemoArg::from(&ctx.user_id),
                    MemoField::Arg(index) => args.memo_arg(*index),
                };
                MemoToken::from(arg)
            })
            .collect(),
    )
}
