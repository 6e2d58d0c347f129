use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::general_config::get_general_config,
        handlers::general_config::save_general_config,
        handlers::general_config::add_purchase_item,
        handlers::general_config::update_purchase_item,
        handlers::general_config::remove_purchase_item,
        handlers::general_config::import_general_config,
        handlers::general_config::export_general_config,
        handlers::activity::list_activities,
        handlers::activity::get_activity,
        handlers::activity::edit_remarks,
        handlers::activity::pending_remarks,
        handlers::activity::commit_remarks,
        handlers::activity::discard_remarks,
        handlers::editor::create_editor,
        handlers::editor::open_editor,
        handlers::editor::get_editor,
        handlers::editor::discard_editor,
        handlers::editor::apply_command,
        handlers::editor::update_fields,
        handlers::editor::import_activity,
        handlers::editor::export_activity,
        handlers::editor::save_editor,
        handlers::statistics::list_draw_records,
        handlers::statistics::user_stats,
        handlers::statistics::output_overview,
        handlers::statistics::outputs_by_activity,
        handlers::statistics::outputs_by_reward_name,
        handlers::statistics::outputs_by_tier,
        handlers::statistics::output_detail,
    ),
    components(
        schemas(
            GeneralConfig,
            PurchaseItem,
            PurchaseItemUpdateRequest,
            Activity,
            ActivityStatus,
            ActivityWheels,
            LocalizedRules,
            Wheel,
            WheelType,
            Reward,
            WheelCommand,
            MoveDirection,
            ActivityFieldsUpdate,
            RewardView,
            WheelView,
            EditorView,
            EditorResponse,
            CreateActivityRequest,
            SortOrder,
            ActivityListItem,
            RemarkEditRequest,
            PendingEditsResponse,
            ImportRequest,
            ExportFile,
            DrawRecord,
            DrawType,
            DrawStatus,
            CompositeReward,
            DrawRecordPage,
            UserDrawStats,
            RewardOutput,
            RewardType,
            TypeQuantity,
            ActivityOutputSummary,
            RewardNameSummary,
            TierShare,
            OutputOverview,
            ApiError,
        )
    ),
    tags(
        (name = "general_config", description = "Wheel general config API"),
        (name = "activity", description = "Activity list and inline remark API"),
        (name = "editor", description = "Activity editor session API"),
        (name = "statistics", description = "Draw record and reward output statistics API"),
    ),
    info(
        title = "Wheel Admin Backend API",
        version = "1.0.0",
        description = "Wheel event configuration REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
