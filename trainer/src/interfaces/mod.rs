pub mod rollout;
pub mod selfplay;
