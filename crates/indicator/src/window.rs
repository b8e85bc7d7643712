/// # Summary
/// 固定容量的滚动环形窗口，为单只证券的逐日扫描保存最近 N 个观测值。
///
/// # Invariants
/// - 内存空间在初始化时一次性分配，后续不再扩容。
/// - 始终保持最近 N 个观测值，`iter` 按插入（时间）顺序产出。
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    // 内部存储容器
    data: Vec<T>,
    // 最大容量
    capacity: usize,
    // 写满后下一次覆盖的位置，同时也是最旧元素的位置
    cursor: usize,
}

impl<T: Copy> RollingWindow<T> {
    /// # Summary
    /// 创建一个新的滚动窗口。
    ///
    /// # Logic
    /// 调用 Vec::with_capacity 预分配指定大小的内存，容量至少为 1。
    ///
    /// # Arguments
    /// * `capacity`: 固定容量上限。
    ///
    /// # Returns
    /// 初始化后的 RollingWindow 实例。
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// # Summary
    /// 推入一个新观测值。
    ///
    /// # Logic
    /// 1. 若未满，则直接 push。
    /// 2. 若已满，则覆盖 cursor 处最旧的数据，并递增（取模）cursor。
    ///
    /// # Returns
    /// 被挤出窗口的最旧观测值，未满时为 None。
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(item);
            None
        } else {
            let evicted = std::mem::replace(&mut self.data[self.cursor], item);
            self.cursor = (self.cursor + 1) % self.capacity;
            Some(evicted)
        }
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// # Summary
    /// 按时间顺序（最旧到最新）遍历窗口内的观测值。
    ///
    /// # Logic
    /// 未满时直接遍历 Vec；已满时从 cursor 处切开，先遍历旧段再遍历新段。
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (older, newer) = if self.is_full() {
            (&self.data[self.cursor..], &self.data[..self.cursor])
        } else {
            (&self.data[..], &self.data[..0])
        };
        older.iter().chain(newer.iter()).copied()
    }

    /// # Summary
    /// 取最新观测之前第 `k` 个观测值，`k = 0` 即最新值。
    ///
    /// # Returns
    /// 窗口内不足 `k + 1` 个观测值时返回 None。
    pub fn lag(&self, k: usize) -> Option<T> {
        let len = self.data.len();
        if k >= len {
            return None;
        }
        let position = len - 1 - k;
        let idx = if self.is_full() {
            (self.cursor + position) % self.capacity
        } else {
            position
        };
        self.data.get(idx).copied()
    }

    /// # Summary
    /// 最近 `n` 个观测值（按时间顺序）。
    ///
    /// # Returns
    /// 观测值不足 `n` 个或 `n == 0` 时返回 None，不做部分窗口计算。
    pub fn tail(&self, n: usize) -> Option<impl Iterator<Item = T> + '_> {
        let len = self.data.len();
        if n == 0 || n > len {
            return None;
        }
        Some(self.iter().skip(len - n))
    }
}

impl RollingWindow<f64> {
    /// 最近 `n` 个观测值的最大值。
    pub fn tail_max(&self, n: usize) -> Option<f64> {
        self.tail(n)?.reduce(f64::max)
    }

    /// 最近 `n` 个观测值的最小值。
    pub fn tail_min(&self, n: usize) -> Option<f64> {
        self.tail(n)?.reduce(f64::min)
    }
}

/// # Summary
/// 固定窗口的滚动均值，每次推入 O(1) 更新。
///
/// # Invariants
/// - 窗口未满时均值为 None。
/// - 累加和每绕环一圈按窗口内容重算一次，浮点误差不随序列长度累积。
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: RollingWindow<f64>,
    sum: f64,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        Self {
            window: RollingWindow::new(period),
            sum: 0.0,
        }
    }

    /// 推入新观测值并更新累加和。
    pub fn push(&mut self, value: f64) {
        let evicted = self.window.push(value);
        if evicted.is_some() && self.window.cursor == 0 {
            self.sum = self.window.iter().sum();
        } else {
            self.sum += value - evicted.unwrap_or(0.0);
        }
    }

    /// 窗口已满时的算术平均。
    pub fn mean(&self) -> Option<f64> {
        if !self.window.is_full() {
            return None;
        }
        u32::try_from(self.window.capacity)
            .ok()
            .map(|n| self.sum / f64::from(n))
    }
}

impl RollingWindow<Option<f64>> {
    /// 最近 `n` 个观测值的算术平均，窗口内任一值缺失则结果缺失。
    pub fn tail_mean(&self, n: usize) -> Option<f64> {
        let (sum, count) = self
            .tail(n)?
            .try_fold((0.0, 0.0), |(sum, count), v| v.map(|v| (sum + v, count + 1.0)))?;
        Some(sum / count)
    }
}
