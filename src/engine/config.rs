// エンジン設定

/// パイプラインの実行設定
#[derive(Debug, Clone)]
pub struct EngineConfig {
    worker_count: usize,
    channel_buffer: usize,
}

impl EngineConfig {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
            channel_buffer: 100,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_channel_buffer(mut self, channel_buffer: usize) -> Self {
        self.channel_buffer = channel_buffer.max(1);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn channel_buffer_size(&self) -> usize {
        self.channel_buffer
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            channel_buffer: 100,
        }
    }
}
