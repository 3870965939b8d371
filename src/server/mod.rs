use crate::boundary::service as boundary_service;
use crate::conf::Conf;
use crate::dashboard;
use crate::Result;
use actix_web::dev::Service;
use actix_web::web::scope;
use actix_web::{
    middleware::{Compress, NormalizePath},
    web::Data,
    App, HttpServer,
};
use futures_util::future::FutureExt;
use time::OffsetDateTime;
use tracing::{info, warn};

pub async fn run(conf: Conf) -> Result<()> {
    // Without boundaries there is nothing to draw, so a failed fetch stops
    // the startup
    let boundaries = Data::new(boundary_service::load(&conf).await?);
    let bind = (conf.bind_addr.clone(), conf.port);
    info!(addr = %bind.0, port = bind.1, "Starting server");
    let conf = Data::new(conf);

    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                let req_real_ip = req
                    .connection_info()
                    .realip_remote_addr()
                    .unwrap_or_default()
                    .to_string();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        let res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64();
                        if res.status().is_server_error() {
                            warn!(req_method, req_path, req_real_ip, res_status, res_time_sec);
                        } else {
                            info!(req_method, req_path, req_real_ip, res_status, res_time_sec);
                        }
                    }
                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(boundaries.clone())
            .app_data(conf.clone())
            .service(dashboard::page::index)
            .service(
                scope("api")
                    .service(dashboard::v1::render)
                    .service(dashboard::v1::export_html),
            )
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
