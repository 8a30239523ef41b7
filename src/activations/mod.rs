mod act_fn;

pub use act_fn::ActFn;
pub(crate) use act_fn::sigmoid;
