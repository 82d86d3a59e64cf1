use crate::mock::envelope::ApiResponse;
use crate::mock::{MockApi, latency};
use crate::model::{ChartDataPoint, DashboardStats, User};

const RECENT_USERS: usize = 5;

impl MockApi {
    pub async fn dashboard_stats(&self) -> ApiResponse<DashboardStats> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.stats.clone())
    }

    /// 近 30 天访问趋势，含 pv / uv
    pub async fn visit_data(&self) -> ApiResponse<Vec<ChartDataPoint>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.visit_data.clone())
    }

    pub async fn sales_data(&self) -> ApiResponse<Vec<ChartDataPoint>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.sales_data.clone())
    }

    pub async fn traffic_data(&self) -> ApiResponse<Vec<ChartDataPoint>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.traffic_data.clone())
    }

    pub async fn recent_users(&self) -> ApiResponse<Vec<User>> {
        self.delay(latency::READ).await;
        let data = self.data.read().await;
        ApiResponse::success(data.users.iter().take(RECENT_USERS).cloned().collect())
    }
}
