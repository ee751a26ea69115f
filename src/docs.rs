use utoipa::OpenApi;

use crate::api::ticks::TickRequest;
use crate::model::slot::Slot;
use crate::model::tick::Tick;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tick API",
        version = "1.0.0",
        description = r#"
## Attendance Tick Tracker

Employees punch predefined daily time slots. A slot can be ticked from a
few minutes before its wall-clock time (configurable early window) until
the end of the day, at most once per employee and date.

### Rules
- Dates and slot deadlines are resolved in the deployment's configured
  timezone, not the host machine's.
- Duplicate ticks return **409** and never create a second row.
- The CSV export is gated by the optional `ADMIN_KEY` shared secret.
"#,
    ),
    paths(
        crate::api::meta::meta,
        crate::api::meta::employees,

        crate::api::ticks::record_tick,
        crate::api::ticks::ticks_today,
        crate::api::ticks::ticks_history,

        crate::api::admin::export_csv
    ),
    components(
        schemas(
            Slot,
            Tick,
            TickRequest
        )
    ),
    tags(
        (name = "Meta", description = "Rule metadata and employee list"),
        (name = "Ticks", description = "Attendance tick APIs"),
        (name = "Admin", description = "Export APIs"),
    )
)]
pub struct ApiDoc;
