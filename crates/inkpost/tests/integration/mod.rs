mod concurrency;
mod publish_flow;
