pub(crate) mod ball;
