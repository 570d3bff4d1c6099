mod job;
mod provider_config;
mod sprint;
mod sprint_status;
mod sync_status;
mod task;
